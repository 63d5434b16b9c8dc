//! Dockerfile form
//!
//! Assembles a Dockerfile from per-instruction values, the way the generator
//! page fills one input per instruction. Lines come out in catalog order, so a
//! form always starts with `FROM` regardless of the order values were set.

use thiserror::Error;
use tracing::debug;

use crate::catalog::{InputType, Instruction};

/// Errors that can occur while filling a form
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormError {
    /// Name matches no instruction in the form
    #[error("unknown instruction: {name}")]
    UnknownInstruction { name: String },

    /// Select instruction given a value outside its options
    #[error("invalid value '{value}' for {instruction} (expected one of: {})", options.join(", "))]
    InvalidOption {
        instruction: String,
        value: String,
        options: Vec<String>,
    },
}

/// Indentation for continuation lines of multi-line values
const CONTINUATION_INDENT: &str = "    ";

/// Values entered against a list of instruction descriptors
#[derive(Debug, Clone)]
pub struct Form<'c> {
    instructions: &'c [Instruction],
    /// Values per instruction, indexed like `instructions`
    values: Vec<Vec<String>>,
}

impl<'c> Form<'c> {
    /// Create an empty form over the given instructions
    pub fn new(instructions: &'c [Instruction]) -> Self {
        Self {
            instructions,
            values: vec![Vec::new(); instructions.len()],
        }
    }

    /// Replace the values of an instruction
    pub fn set(&mut self, name: &str, value: impl Into<String>) -> Result<(), FormError> {
        let value = value.into();
        let index = self.validate(name, &value)?;
        self.values[index] = vec![value];
        Ok(())
    }

    /// Add another line for an instruction (several `RUN` or `COPY` steps)
    pub fn add(&mut self, name: &str, value: impl Into<String>) -> Result<(), FormError> {
        let value = value.into();
        let index = self.validate(name, &value)?;
        self.values[index].push(value);
        Ok(())
    }

    /// Values entered for an instruction
    pub fn values(&self, name: &str) -> &[String] {
        self.position(name)
            .map(|index| self.values[index].as_slice())
            .unwrap_or(&[])
    }

    pub fn is_empty(&self) -> bool {
        self.values.iter().all(|v| v.iter().all(|s| s.trim().is_empty()))
    }

    /// Emit `NAME value` lines in catalog order, skipping blank values
    pub fn render(&self) -> String {
        let mut out = String::new();
        for (instruction, values) in self.instructions.iter().zip(&self.values) {
            for value in values {
                let value = value.trim();
                if value.is_empty() {
                    continue;
                }
                out.push_str(&instruction.name);
                out.push(' ');
                out.push_str(&format_value(instruction, value));
                out.push('\n');
            }
        }
        debug!(bytes = out.len(), "rendered form");
        out
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.instructions
            .iter()
            .position(|i| i.name.eq_ignore_ascii_case(name))
    }

    fn validate(&self, name: &str, value: &str) -> Result<usize, FormError> {
        let index = self
            .position(name)
            .ok_or_else(|| FormError::UnknownInstruction {
                name: name.to_string(),
            })?;

        let instruction = &self.instructions[index];
        if instruction.input_type == InputType::Select
            && !instruction.options.iter().any(|o| o == value)
        {
            return Err(FormError::InvalidOption {
                instruction: instruction.name.clone(),
                value: value.to_string(),
                options: instruction.options.clone(),
            });
        }
        Ok(index)
    }
}

/// Join the lines of a textarea value with ` \` continuations
fn format_value(instruction: &Instruction, value: &str) -> String {
    if instruction.input_type != InputType::Textarea || !value.contains('\n') {
        return value.to_string();
    }

    let lines: Vec<&str> = value
        .lines()
        .map(|line| line.trim().trim_end_matches('\\').trim_end())
        .filter(|line| !line.is_empty())
        .collect();
    lines.join(&format!(" \\\n{}", CONTINUATION_INDENT))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{builtin, ArtifactKind};
    use pretty_assertions::assert_eq;

    fn dockerfile_form() -> Form<'static> {
        Form::new(builtin().section(ArtifactKind::Dockerfile).instructions())
    }

    fn select_instruction() -> Instruction {
        Instruction {
            name: "SHELL".to_string(),
            scope: None,
            description: String::new(),
            example: String::new(),
            input_type: InputType::Select,
            options: vec!["[\"/bin/sh\", \"-c\"]".to_string(), "[\"/bin/bash\", \"-c\"]".to_string()],
            hint: None,
        }
    }

    #[test]
    fn test_catalog_order() {
        let mut form = dockerfile_form();
        form.set("EXPOSE", "8080").unwrap();
        form.set("WORKDIR", "/app").unwrap();
        form.set("FROM", "node:18-alpine").unwrap();
        assert_eq!(form.render(), "FROM node:18-alpine\nWORKDIR /app\nEXPOSE 8080\n");
    }

    #[test]
    fn test_add_repeats_instruction() {
        let mut form = dockerfile_form();
        form.set("FROM", "alpine").unwrap();
        form.add("RUN", "apk add curl").unwrap();
        form.add("run", "adduser -D app").unwrap();
        assert_eq!(
            form.render(),
            "FROM alpine\nRUN apk add curl\nRUN adduser -D app\n"
        );
        assert_eq!(form.values("RUN").len(), 2);
    }

    #[test]
    fn test_set_replaces_values() {
        let mut form = dockerfile_form();
        form.add("RUN", "a").unwrap();
        form.add("RUN", "b").unwrap();
        form.set("RUN", "c").unwrap();
        assert_eq!(form.values("RUN"), &["c".to_string()]);
    }

    #[test]
    fn test_blank_values_skipped() {
        let mut form = dockerfile_form();
        form.set("FROM", "alpine").unwrap();
        form.set("USER", "   ").unwrap();
        assert_eq!(form.render(), "FROM alpine\n");
        assert!(!form.is_empty());
        assert!(dockerfile_form().is_empty());
    }

    #[test]
    fn test_textarea_continuations() {
        let mut form = dockerfile_form();
        form.set("RUN", "apt-get update\napt-get install -y curl \\\n\nrm -rf /var/lib/apt/lists/*")
            .unwrap();
        assert_eq!(
            form.render(),
            "RUN apt-get update \\\n    apt-get install -y curl \\\n    rm -rf /var/lib/apt/lists/*\n"
        );
    }

    #[test]
    fn test_text_input_verbatim() {
        let mut form = dockerfile_form();
        form.set("EXPOSE", "80 443").unwrap();
        assert_eq!(form.render(), "EXPOSE 80 443\n");
    }

    #[test]
    fn test_unknown_instruction() {
        let mut form = dockerfile_form();
        assert_eq!(
            form.set("MAINTAINER", "me"),
            Err(FormError::UnknownInstruction {
                name: "MAINTAINER".to_string()
            })
        );
    }

    #[test]
    fn test_select_validates_options() {
        let instructions = vec![select_instruction()];
        let mut form = Form::new(&instructions);
        assert!(form.set("SHELL", "[\"/bin/bash\", \"-c\"]").is_ok());
        let err = form.set("SHELL", "zsh").unwrap_err();
        assert!(matches!(err, FormError::InvalidOption { .. }));
        assert!(err.to_string().contains("zsh"));
    }
}
