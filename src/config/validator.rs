use regex::Regex;
use serde::Serialize;
use std::collections::HashMap;

#[derive(Debug, Clone, Serialize)]
pub struct ValidationRule {
    pub name: &'static str,
    pub description: &'static str,
    pub severity: ValidationSeverity,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationSeverity {
    Error,
    Warning,
    Info,
}

#[derive(Debug, Clone, Serialize)]
pub struct ValidationResult {
    pub rule: ValidationRule,
    pub message: String,
    /// 1-based position of the declaration in the list
    pub declaration_index: usize,
    pub declaration: String,
}

impl ValidationResult {
    pub fn severity(&self) -> ValidationSeverity {
        self.rule.severity
    }
}

/// Lints a declaration list. The parser accepts any non-comment line, so
/// this is the only place names are judged.
pub struct ConfigValidator {
    rules: Vec<ValidationRule>,
    identifier_regex: Regex,
}

impl ConfigValidator {
    pub fn new() -> Result<Self, regex::Error> {
        let identifier_regex = Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$")?;

        Ok(Self {
            rules: Self::default_rules(),
            identifier_regex,
        })
    }

    pub fn rules(&self) -> &[ValidationRule] {
        &self.rules
    }

    pub fn validate_declarations(&self, declarations: &[String]) -> Vec<ValidationResult> {
        let mut results = Vec::new();
        let mut first_seen: HashMap<&str, usize> = HashMap::new();

        for (offset, name) in declarations.iter().enumerate() {
            let index = offset + 1;

            if !self.identifier_regex.is_match(name) {
                results.push(self.result(
                    "invalid_identifier",
                    format!("'{}' is not a valid environment variable name", name),
                    index,
                    name,
                ));
            } else if name.chars().any(|c| c.is_ascii_lowercase()) {
                results.push(self.result(
                    "lowercase_name",
                    format!("'{}' contains lowercase letters", name),
                    index,
                    name,
                ));
            }

            if let Some(first) = first_seen.get(name.as_str()) {
                results.push(self.result(
                    "duplicate_declaration",
                    format!("'{}' is already declared at position {}", name, first),
                    index,
                    name,
                ));
            } else {
                first_seen.insert(name.as_str(), index);
            }
        }

        results
    }

    pub fn has_errors(results: &[ValidationResult]) -> bool {
        results
            .iter()
            .any(|r| r.severity() == ValidationSeverity::Error)
    }

    fn result(&self, rule: &str, message: String, index: usize, name: &str) -> ValidationResult {
        let rule = self
            .rules
            .iter()
            .find(|r| r.name == rule)
            .cloned()
            .unwrap_or(ValidationRule {
                name: "unknown",
                description: "Unregistered rule",
                severity: ValidationSeverity::Info,
            });

        ValidationResult {
            rule,
            message,
            declaration_index: index,
            declaration: name.to_string(),
        }
    }

    fn default_rules() -> Vec<ValidationRule> {
        vec![
            ValidationRule {
                name: "invalid_identifier",
                description: "Names must start with a letter or underscore and contain only letters, digits and underscores",
                severity: ValidationSeverity::Error,
            },
            ValidationRule {
                name: "duplicate_declaration",
                description: "Each name should be declared once",
                severity: ValidationSeverity::Warning,
            },
            ValidationRule {
                name: "lowercase_name",
                description: "Environment variable names are conventionally upper case",
                severity: ValidationSeverity::Info,
            },
        ]
    }
}
