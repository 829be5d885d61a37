//! Taylor expansion task read from a text document.
//!
//! ```text
//! expansion
//! expression: exp(x)*ln(1 + y)
//! variables: x, y
//! point: 0, 0
//! order: 2
//! settings
//! loglevel: info
//! log_to_file: false
//! simplify: true
//! parallel: false
//! max_order: 20
//! max_terms: 100000
//! csv: terms.csv
//! ```
//! The `expansion` section is required. Everything in `settings` is optional.
//! Point coordinates are parsed as expressions, so `point: a, b + 1` is a symbolic point.

use crate::Utils::logger::{init_logger, save_terms_to_csv};
use crate::Utils::task_parser::{DocumentMap, SectionMap, Value, parse_document_as};
use crate::symbolic::symbolic_engine::Expr;
use crate::symbolic::symbolic_errors::SymbolicError;
use crate::taylor::taylor_errors::TaylorError;
use crate::taylor::taylor_expander::{ExpansionLimits, TaylorExpander, TaylorSeries};
use log::{info, warn};
use simplelog::LevelFilter;
use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::str::FromStr;

const EXPANSION: &str = "expansion";
const SETTINGS: &str = "settings";
const EXPANSION_KEYS: [&str; 4] = ["expression", "variables", "point", "order"];
const SETTINGS_KEYS: [&str; 7] = [
    "loglevel",
    "log_to_file",
    "simplify",
    "parallel",
    "max_order",
    "max_terms",
    "csv",
];

/// Errors of reading or running a task
#[derive(Debug)]
pub enum TaskError {
    Io(io::Error),
    /// the document is not a valid task document
    Parse(String),
    MissingKey { section: String, key: String },
    BadValue {
        key: String,
        value: String,
        expected: &'static str,
    },
    Symbolic(SymbolicError),
    Taylor(TaylorError),
}

impl fmt::Display for TaskError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            TaskError::Io(err) => write!(f, "I/O error: {}", err),
            TaskError::Parse(msg) => write!(f, "{}", msg),
            TaskError::MissingKey { section, key } => {
                write!(f, "Missing key '{}' in section '{}'", key, section)
            }
            TaskError::BadValue {
                key,
                value,
                expected,
            } => write!(
                f,
                "Bad value '{}' for key '{}', expected {}",
                value, key, expected
            ),
            TaskError::Symbolic(err) => write!(f, "{}", err),
            TaskError::Taylor(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for TaskError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TaskError::Io(err) => Some(err),
            TaskError::Symbolic(err) => Some(err),
            TaskError::Taylor(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for TaskError {
    fn from(err: io::Error) -> Self {
        TaskError::Io(err)
    }
}

impl From<SymbolicError> for TaskError {
    fn from(err: SymbolicError) -> Self {
        TaskError::Symbolic(err)
    }
}

impl From<TaylorError> for TaskError {
    fn from(err: TaylorError) -> Self {
        TaskError::Taylor(err)
    }
}

/// `debug|info|warn|error` or `off|none` (logging disabled, `None`)
pub fn parse_loglevel(level: &str) -> Result<Option<LevelFilter>, TaskError> {
    match level {
        "debug" => Ok(Some(LevelFilter::Debug)),
        "info" => Ok(Some(LevelFilter::Info)),
        "warn" => Ok(Some(LevelFilter::Warn)),
        "error" => Ok(Some(LevelFilter::Error)),
        "off" | "none" => Ok(None),
        _ => Err(TaskError::BadValue {
            key: "loglevel".to_string(),
            value: level.to_string(),
            expected: "debug, info, warn, error, off or none",
        }),
    }
}

/// Everything needed to run one expansion
#[derive(Debug, Clone)]
pub struct TaylorTask {
    pub expression: Expr,
    pub variables: Vec<Expr>,
    pub point: Vec<Expr>,
    pub order: usize,
    pub loglevel: Option<String>,
    pub log_to_file: bool,
    pub simplify: bool,
    pub parallel: bool,
    pub limits: ExpansionLimits,
    /// write the terms to this CSV file after a successful expansion
    pub csv: Option<PathBuf>,
}

impl TaylorTask {
    pub fn new(expression: Expr, variables: Vec<Expr>, point: Vec<Expr>, order: usize) -> Self {
        TaylorTask {
            expression,
            variables,
            point,
            order,
            loglevel: Some("info".to_string()),
            log_to_file: false,
            simplify: true,
            parallel: false,
            limits: ExpansionLimits::default(),
            csv: None,
        }
    }

    /// Template for [`parse_document_as`]: every known key, `None` until found
    fn template() -> DocumentMap {
        let section = |keys: &[&str]| -> SectionMap {
            keys.iter().map(|key| (key.to_string(), None)).collect()
        };
        let mut template = HashMap::new();
        template.insert(EXPANSION.to_string(), section(&EXPANSION_KEYS));
        template.insert(SETTINGS.to_string(), section(&SETTINGS_KEYS));
        template
    }

    pub fn from_document(doc: &DocumentMap) -> Result<Self, TaskError> {
        for (title, section) in doc {
            let known: &[&str] = match title.as_str() {
                EXPANSION => &EXPANSION_KEYS,
                SETTINGS => &SETTINGS_KEYS,
                _ => {
                    warn!("unknown section '{}' ignored", title);
                    continue;
                }
            };
            for key in section.keys().filter(|key| !known.contains(&key.as_str())) {
                warn!("unknown key '{}' in section '{}' ignored", key, title);
            }
        }

        let expansion = doc.get(EXPANSION).ok_or_else(|| TaskError::MissingKey {
            section: EXPANSION.to_string(),
            key: "expression".to_string(),
        })?;
        let expression = single(required(expansion, EXPANSION, "expression")?, "expression")?;
        let expression = Expr::parse_expression(&expression.to_string_value())?;
        let variables = required(expansion, EXPANSION, "variables")?
            .iter()
            .map(|value| -> Result<Expr, SymbolicError> {
                let variable = Expr::parse_expression(&value.to_string_value())?;
                variable.as_variable()?;
                Ok(variable)
            })
            .collect::<Result<Vec<Expr>, SymbolicError>>()?;
        let point = required(expansion, EXPANSION, "point")?
            .iter()
            .map(|value| match value {
                Value::Float(f) if !f.is_finite() => Err(TaskError::BadValue {
                    key: "point".to_string(),
                    value: value.to_string_value(),
                    expected: "a finite number or an expression",
                }),
                _ => Ok(Expr::parse_expression(&value.to_string_value())?),
            })
            .collect::<Result<Vec<Expr>, TaskError>>()?;
        let order = single(required(expansion, EXPANSION, "order")?, "order")?;
        let order = as_usize(order, "order")?;

        let mut task = TaylorTask::new(expression, variables, point, order);
        let Some(settings) = doc.get(SETTINGS) else {
            return Ok(task);
        };
        if let Some(level) = optional(settings, "loglevel")? {
            let level = level.to_string_value();
            parse_loglevel(&level)?;
            task.loglevel = Some(level);
        }
        if let Some(value) = optional(settings, "log_to_file")? {
            task.log_to_file = as_bool(value, "log_to_file")?;
        }
        if let Some(value) = optional(settings, "simplify")? {
            task.simplify = as_bool(value, "simplify")?;
        }
        if let Some(value) = optional(settings, "parallel")? {
            task.parallel = as_bool(value, "parallel")?;
        }
        if let Some(value) = optional(settings, "max_order")? {
            task.limits.max_order = as_usize(value, "max_order")?;
        }
        if let Some(value) = optional(settings, "max_terms")? {
            task.limits.max_terms = as_usize(value, "max_terms")?;
        }
        if let Some(value) = optional(settings, "csv")? {
            task.csv = Some(PathBuf::from(value.to_string_value()));
        }
        Ok(task)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, TaskError> {
        let contents = fs::read_to_string(path)?;
        contents.parse()
    }

    /// Expander configured from the settings of the task
    pub fn expander(&self) -> TaylorExpander {
        TaylorExpander::new()
            .with_simplify(self.simplify)
            .with_parallel(self.parallel)
            .with_limits(self.limits)
    }

    fn run(&self) -> Result<TaylorSeries, TaskError> {
        let series =
            self.expander()
                .series(&self.expression, &self.variables, &self.point, self.order)?;
        if let Some(path) = &self.csv {
            save_terms_to_csv(&series, path)?;
            info!("terms written to {}", path.display());
        }
        Ok(series)
    }

    /// Runs the expansion with logging set up from `loglevel` (`off`/`none` disables it).
    /// If a logger is already installed the expansion still runs and logs through it.
    pub fn solve(&self) -> Result<TaylorSeries, TaskError> {
        let level = match &self.loglevel {
            Some(level) => parse_loglevel(level)?,
            None => Some(LevelFilter::Info),
        };
        match level {
            None => self.run(),
            Some(level) => {
                if init_logger(level, self.log_to_file) {
                    info!("Program started with loglevel: {}", level);
                }
                let res = self.run();
                info!("Program ended");
                res
            }
        }
    }
}

impl FromStr for TaylorTask {
    type Err = TaskError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let doc = parse_document_as(input, Some(TaylorTask::template())).map_err(TaskError::Parse)?;
        TaylorTask::from_document(&doc)
    }
}

fn required<'a>(
    section: &'a SectionMap,
    title: &str,
    key: &str,
) -> Result<&'a [Value], TaskError> {
    match section.get(key) {
        Some(Some(values)) if !values.is_empty() => Ok(values),
        _ => Err(TaskError::MissingKey {
            section: title.to_string(),
            key: key.to_string(),
        }),
    }
}

fn optional<'a>(section: &'a SectionMap, key: &str) -> Result<Option<&'a Value>, TaskError> {
    match section.get(key) {
        Some(Some(values)) if !values.is_empty() => single(values, key).map(Some),
        _ => Ok(None),
    }
}

fn single<'a>(values: &'a [Value], key: &str) -> Result<&'a Value, TaskError> {
    match values {
        [value] => Ok(value),
        _ => Err(TaskError::BadValue {
            key: key.to_string(),
            value: values.iter().map(|v| v.to_string_value()).collect::<Vec<_>>().join(", "),
            expected: "a single value",
        }),
    }
}

fn as_usize(value: &Value, key: &str) -> Result<usize, TaskError> {
    value
        .as_integer()
        .and_then(|i| usize::try_from(i).ok())
        .ok_or_else(|| TaskError::BadValue {
            key: key.to_string(),
            value: value.to_string_value(),
            expected: "a non-negative integer",
        })
}

fn as_bool(value: &Value, key: &str) -> Result<bool, TaskError> {
    value.as_boolean().ok_or_else(|| TaskError::BadValue {
        key: key.to_string(),
        value: value.to_string_value(),
        expected: "true or false",
    })
}
