/// parse document with structure like
/// ```text
/// title1
/// key1: value1, value2
/// key2: value3
/// title2
/// key3: value4, value5
/// ```
/// which has titles and pairs key-vector of values. Every title or pair takes its own
/// line, so values may contain spaces (`expression: x^2 + sin(y)`). Values are split by
/// commas outside of brackets. Lines starting with //, #, % or ; are comments.
/// The user may pass a template HashMap<String, HashMap<String, Option<Vec<Value>>>>;
/// if some field i.e field_x of the template is not found in the document it will be
/// field_x: None in the result.
use nom::{
    IResult, Parser,
    branch::alt,
    bytes::complete::{tag, take_while},
    character::complete::{alpha1, alphanumeric1, space0},
    combinator::{all_consuming, map, recognize},
    multi::many0,
    sequence::{delimited, pair, separated_pair},
};
use std::collections::HashMap;
use std::fmt::Display;

pub type DocumentMap = HashMap<String, SectionMap>;
pub type SectionMap = HashMap<String, Option<Vec<Value>>>;
/// enum to represent different value types:
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    String(String),
    Float(f64),
    Integer(i64),
    Boolean(bool),
}

impl Value {
    /// Integer, then float, then boolean, otherwise string
    pub fn from_text(s: &str) -> Value {
        let s = s.trim();
        if let Ok(val) = s.parse::<i64>() {
            Value::Integer(val)
        } else if let Ok(val) = s.parse::<f64>() {
            Value::Float(val)
        } else if let Ok(val) = s.parse::<bool>() {
            Value::Boolean(val)
        } else {
            Value::String(s.to_string())
        }
    }

    pub fn as_string(&self) -> Option<&String> {
        if let Value::String(s) = self {
            Some(s)
        } else {
            None
        }
    }

    /// floats and integers both convert
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            Value::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        if let Value::Integer(i) = self {
            Some(*i)
        } else {
            None
        }
    }

    pub fn as_boolean(&self) -> Option<bool> {
        if let Value::Boolean(b) = self {
            Some(*b)
        } else {
            None
        }
    }

    // Try to convert to string representation
    pub fn to_string_value(&self) -> String {
        match self {
            Value::String(s) => s.clone(),
            Value::Float(f) => f.to_string(),
            Value::Integer(i) => i.to_string(),
            Value::Boolean(b) => b.to_string(),
        }
    }
}

// Implement Display for Value
impl Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::String(s) => write!(f, "{}", s),
            Value::Float(val) => write!(f, "{}", val),
            Value::Integer(val) => write!(f, "{}", val),
            Value::Boolean(val) => write!(f, "{}", val),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Line {
    Title(String),
    Pair(String, Vec<Value>),
}

/// Parses an identifier (letters, digits and underscores, not starting with a digit)
fn parse_identifier(input: &str) -> IResult<&str, String> {
    let parser = recognize(pair(
        alt((alpha1, tag("_"))),
        many0(alt((alphanumeric1, tag("_")))),
    ));
    map(parser, String::from).parse(input)
}

/// Splits the rest of the line at commas that are not inside brackets
fn split_values(input: &str) -> Result<Vec<Value>, String> {
    if input.trim().is_empty() {
        return Ok(Vec::new());
    }
    let mut values = Vec::new();
    let mut depth: i32 = 0;
    let mut start = 0;
    for (i, c) in input.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => depth -= 1,
            ',' if depth == 0 => {
                values.push(&input[start..i]);
                start = i + 1;
            }
            _ => {}
        }
        if depth < 0 {
            return Err(format!("unbalanced brackets in '{}'", input));
        }
    }
    if depth != 0 {
        return Err(format!("unbalanced brackets in '{}'", input));
    }
    values.push(&input[start..]);
    values
        .into_iter()
        .map(|s| {
            if s.trim().is_empty() {
                Err(format!("empty value in '{}'", input))
            } else {
                Ok(Value::from_text(s))
            }
        })
        .collect()
}

/// Parses `key: values` where the values run to the end of the line
fn parse_key_value_pair(input: &str) -> IResult<&str, (String, &str)> {
    let colon_separator = delimited(space0, tag(":"), space0);
    separated_pair(parse_identifier, colon_separator, take_while(|_| true)).parse(input)
}

fn parse_line(line: &str) -> Result<Line, String> {
    let line = line.trim();
    if let Ok((_, (key, rest))) = parse_key_value_pair(line) {
        return Ok(Line::Pair(key, split_values(rest)?));
    }
    match all_consuming(parse_identifier).parse(line) {
        Ok((_, title)) => Ok(Line::Title(title)),
        Err(_) => Err(format!("cannot parse line '{}'", line)),
    }
}

/// Filters out comment lines (starting with //, #, %, or ;) and empty lines
pub fn filter_comments(input: &str) -> String {
    input
        .lines()
        .filter(|line| {
            let trimmed = line.trim();
            !trimmed.starts_with("//")
                && !trimmed.starts_with('#')
                && !trimmed.starts_with('%')
                && !trimmed.starts_with(';')
                && !trimmed.is_empty()
        })
        .collect::<Vec<&str>>()
        .join("\n")
}

/// Parses the entire document into a HashMap
pub fn parse_document(input: &str) -> Result<DocumentMap, String> {
    let filtered = filter_comments(input);
    if filtered.is_empty() {
        return Err("Parsing error: empty document".to_string());
    }
    let mut result: DocumentMap = HashMap::new();
    let mut current: Option<String> = None;
    for (number, line) in filtered.lines().enumerate() {
        let parsed = parse_line(line)
            .map_err(|e| format!("Parsing error in line {}: {}", number + 1, e))?;
        match parsed {
            Line::Title(title) => {
                result.entry(title.clone()).or_default();
                current = Some(title);
            }
            Line::Pair(key, values) => {
                let title = current.as_ref().ok_or_else(|| {
                    format!("Parsing error: key '{}' comes before any section title", key)
                })?;
                result
                    .entry(title.clone())
                    .or_default()
                    .insert(key, Some(values));
            }
        }
    }
    Ok(result)
}

/// Parses a document and merges with a template HashMap, ensuring all expected keys exist
fn parse_document_with_template(input: &str, template: &DocumentMap) -> Result<DocumentMap, String> {
    let mut parsed = parse_document(input)?;
    // Ensure all expected titles and keys exist
    for (title, keys_map) in template {
        let section_map = parsed.entry(title.clone()).or_default();
        for key in keys_map.keys() {
            section_map.entry(key.clone()).or_insert(None);
        }
    }
    Ok(parsed)
}

/// Helper function to parse a document
pub fn parse_document_as(input: &str, template: Option<DocumentMap>) -> Result<DocumentMap, String> {
    match template {
        Some(template) => parse_document_with_template(input, &template),
        None => parse_document(input),
    }
}

/////////////////////////////TESTS////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::{Read, Write};
    use tempfile::tempdir;

    #[test]
    fn test_parse_identifier() {
        let (remaining, key) = parse_identifier("key_1: value1").unwrap();
        assert_eq!(key, "key_1");
        assert_eq!(remaining, ": value1");
        assert!(parse_identifier("1key").is_err());
    }

    #[test]
    fn test_value_types() {
        assert_eq!(Value::from_text(" 123 "), Value::Integer(123));
        assert_eq!(Value::from_text("45.67"), Value::Float(45.67));
        assert_eq!(Value::from_text("true"), Value::Boolean(true));
        assert_eq!(
            Value::from_text("x^2 + 1"),
            Value::String("x^2 + 1".to_string())
        );
        assert_eq!(Value::Integer(3).as_float(), Some(3.0));
    }

    #[test]
    fn test_parse_line() {
        assert_eq!(
            parse_line("  expansion ").unwrap(),
            Line::Title("expansion".to_string())
        );
        assert_eq!(
            parse_line("point : 0, 1.5, a + b").unwrap(),
            Line::Pair(
                "point".to_string(),
                vec![
                    Value::Integer(0),
                    Value::Float(1.5),
                    Value::String("a + b".to_string())
                ]
            )
        );
        // commas inside brackets do not split
        assert_eq!(
            parse_line("expression: f(x, y)").unwrap(),
            Line::Pair(
                "expression".to_string(),
                vec![Value::String("f(x, y)".to_string())]
            )
        );
        assert_eq!(
            parse_line("key1:").unwrap(),
            Line::Pair("key1".to_string(), Vec::new())
        );
        assert!(parse_line("key1: value1, ").is_err());
        assert!(parse_line("key1: sin(x").is_err());
        assert!(parse_line("two words").is_err());
    }

    #[test]
    fn test_parse_document_basic() {
        let input = "section1\n key1: value1, value2\n key2: value3\nsection2\n key3: value4, value5";
        let doc = parse_document(input).unwrap();
        assert_eq!(doc.len(), 2);

        let section1 = &doc["section1"];
        assert_eq!(section1.len(), 2);
        assert_eq!(
            section1.get("key1").unwrap().as_ref().unwrap(),
            &vec![
                Value::String("value1".to_string()),
                Value::String("value2".to_string())
            ]
        );
        assert_eq!(
            doc["section2"].get("key3").unwrap().as_ref().unwrap(),
            &vec![
                Value::String("value4".to_string()),
                Value::String("value5".to_string())
            ]
        );
    }

    #[test]
    fn test_parse_document_with_comments() {
        let input = r#"
        // task
        expansion
          # the function
          expression: exp(x)*ln(1 + y)
          % spaces and brackets survive
          point: 0, 0
        ; end
        "#;
        let doc = parse_document(input).unwrap();
        let expansion = &doc["expansion"];
        assert_eq!(
            expansion.get("expression").unwrap().as_ref().unwrap(),
            &vec![Value::String("exp(x)*ln(1 + y)".to_string())]
        );
        assert_eq!(
            expansion.get("point").unwrap().as_ref().unwrap(),
            &vec![Value::Integer(0), Value::Integer(0)]
        );
    }

    #[test]
    fn test_parse_document_errors() {
        assert!(parse_document("").is_err());
        assert!(parse_document("// only a comment").is_err());
        assert!(parse_document("key1: value1\nsection1").is_err());
        assert!(parse_document("section1\n key1: value1, \n invalid structure").is_err());
    }

    #[test]
    fn test_parse_document_with_template() {
        let mut template = HashMap::new();
        let mut section1_map = HashMap::new();
        section1_map.insert("key1".to_string(), None);
        section1_map.insert("key3".to_string(), None); // Not in the input
        template.insert("section1".to_string(), section1_map);
        template.insert("section3".to_string(), HashMap::new()); // Not in the input

        let input = "section1\n key1: value1, value2\n key2: value3";
        let result = parse_document_as(input, Some(template)).unwrap();

        assert_eq!(result.len(), 2);
        let section1 = &result["section1"];
        assert_eq!(section1.len(), 3);
        assert!(section1.get("key3").unwrap().is_none()); // Missing key should be None
        assert_eq!(
            section1.get("key2").unwrap().as_ref().unwrap(),
            &vec![Value::String("value3".to_string())]
        );
        assert_eq!(result["section3"].len(), 0);
    }

    #[test]
    fn test_parse_document_from_file() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("test_doc.txt");

        let mut file = File::create(&file_path).unwrap();
        writeln!(file, "expansion").unwrap();
        writeln!(file, "  variables: x, y").unwrap();
        writeln!(file, "  order: 3").unwrap();
        writeln!(file, "settings").unwrap();
        writeln!(file, "  parallel: true").unwrap();

        let mut file = File::open(&file_path).unwrap();
        let mut contents = String::new();
        file.read_to_string(&mut contents).unwrap();

        let result = parse_document_as(&contents, None).unwrap();
        assert_eq!(result.len(), 2);
        assert_eq!(
            result["expansion"].get("order").unwrap().as_ref().unwrap(),
            &vec![Value::Integer(3)]
        );
        assert_eq!(
            result["settings"].get("parallel").unwrap().as_ref().unwrap(),
            &vec![Value::Boolean(true)]
        );
    }
}
