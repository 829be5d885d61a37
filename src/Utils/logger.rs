use crate::taylor::taylor_expander::TaylorSeries;
use chrono::Local;
use csv::Writer;
use simplelog::*;
use std::fs::File;
use std::io;
use std::path::Path;

/// Writes one row per term of the series: the zero order term first, then the generated
/// terms in generation order.
pub fn save_terms_to_csv<P: AsRef<Path>>(series: &TaylorSeries, filename: P) -> io::Result<()> {
    let file = File::create(filename)?;
    let mut writer = Writer::from_writer(file);

    writer.write_record(["order", "path", "coefficient", "factor", "monomial"])?;
    writer.write_record([
        "0".to_string(),
        String::new(),
        series.zero_order.to_string(),
        "1".to_string(),
        "1".to_string(),
    ])?;
    for term in &series.terms {
        writer.write_record([
            term.order.to_string(),
            series.path_label(term),
            term.coefficient.to_string(),
            term.factor.to_string(),
            term.monomial.to_string(),
        ])?;
    }

    writer.flush()?;
    Ok(())
}

/// Terminal logger plus, on request, a copy of the log in `taylor_log_<date>_<time>.txt`.
///
/// Returns false if a global logger was already installed; logging then goes wherever
/// the existing logger sends it.
pub fn init_logger(level: LevelFilter, log_to_file: bool) -> bool {
    let mut loggers: Vec<Box<dyn SharedLogger>> = Vec::new();
    loggers.push(TermLogger::new(
        level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    ));
    if log_to_file {
        let date_and_time = Local::now().format("%Y-%m-%d_%H-%M-%S");
        let name = format!("taylor_log_{}.txt", date_and_time);
        match File::create(&name) {
            Ok(file) => loggers.push(WriteLogger::new(level, Config::default(), file)),
            Err(e) => eprintln!("cannot create log file {}: {}", name, e),
        }
    }
    CombinedLogger::init(loggers).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbolic::symbolic_engine::Expr;
    use crate::taylor::taylor_expander::TaylorExpander;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_save_terms_to_csv() {
        let f = Expr::parse_expression("x*y").unwrap();
        let vars = Expr::Symbols("x, y");
        let point = vec![Expr::Const(0.0), Expr::Const(0.0)];
        let series = TaylorExpander::new().series(&f, &vars, &point, 2).unwrap();

        let dir = tempdir().unwrap();
        let path = dir.path().join("terms.csv");
        save_terms_to_csv(&series, &path).unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        // header, zero order row, 2 + 4 generated terms
        assert_eq!(lines.len(), 8);
        assert_eq!(lines[0], "order,path,coefficient,factor,monomial");
        assert!(lines[1].starts_with("0,,"));
        assert!(lines[2].starts_with("1,x,"));
        assert!(lines[3].starts_with("1,y,"));
        assert!(lines[5].starts_with("2,\"x,y\",1,(1 / 2),"));
        assert!(lines[6].starts_with("2,\"y,x\",1,(1 / 2),"));
    }
}
