use RustedTaylor::taylor::taylor_task::TaylorTask;

fn main() {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/demos/tasks/mixed_partials.txt");
    let task = TaylorTask::from_file(path).unwrap();
    let series = task.solve().unwrap();
    println!("T = {}", series.to_expr().simplify());
    println!(
        "{} generated terms, {} nonzero",
        series.len(),
        series.nonzero_terms()
    );
}
