#![allow(non_snake_case)]
use RustedTaylor::taylor::taylor_task::TaylorTask;
use std::env;
use std::process;

fn main() {
    let args: Vec<String> = env::args().collect();
    let Some(path) = args.get(1) else {
        eprintln!("usage: RustedTaylor <task-file>");
        process::exit(1);
    };
    let result = TaylorTask::from_file(path).and_then(|task| task.solve());
    match result {
        Ok(series) => {
            println!("{}", series.to_expr());
            println!(
                "{} terms, {} with nonzero coefficient",
                series.len() + 1,
                series.nonzero_terms() + usize::from(!series.zero_order.is_zero())
            );
        }
        Err(e) => {
            eprintln!("error: {}", e);
            process::exit(1);
        }
    }
}
