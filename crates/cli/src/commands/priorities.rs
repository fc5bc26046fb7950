use crate::errors::CliResult;
use entigen_core::standard_order;
use serde_json::json;
use std::fmt::Write as _;

pub fn execute(json: bool) -> CliResult<String> {
    let order = standard_order()?;

    if json {
        let priorities: Vec<_> = order
            .iter()
            .map(|priority| {
                json!({
                    "name": priority.name,
                    "queue": priority.queue,
                    "before": priority.before,
                    "skip": priority.skip,
                })
            })
            .collect();
        return Ok(serde_json::to_string_pretty(&priorities)?);
    }

    let mut output = String::new();
    for (index, priority) in order.iter().enumerate() {
        let _ = write!(output, "{:>2}. {}", index + 1, priority.name);
        if let Some(anchor) = &priority.before {
            let _ = write!(output, " (before {anchor})");
        }
        output.push('\n');
    }
    Ok(output.trim_end().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_order() {
        let output = execute(false).unwrap();
        let lines: Vec<_> = output.lines().collect();
        assert_eq!(lines[0], " 1. initializing");
        assert!(lines.contains(&" 3. configuring"));
        assert!(output.contains("writingEntities (before transform)"));
        assert!(lines.last().unwrap().ends_with(". end"));
    }

    #[test]
    fn test_json_order() {
        let output = execute(true).unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        let priorities = value.as_array().unwrap();
        assert_eq!(priorities[0]["name"], "initializing");
        assert_eq!(priorities[0]["before"], serde_json::Value::Null);
        let loading = priorities
            .iter()
            .find(|p| p["name"] == "loadingEntities")
            .unwrap();
        assert_eq!(loading["before"], "preparingEachEntity");
        assert_eq!(loading["skip"], true);
    }
}
