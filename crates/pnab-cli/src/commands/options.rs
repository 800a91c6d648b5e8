use crate::cli::OptionsArgs;
use crate::error::{CliError, Result};
use pnab::core::options::OptionCategory;
use pnab::core::options::catalog::{self, CategorySpec};
use std::fmt::Write;

pub fn run(args: OptionsArgs) -> Result<()> {
    let selected = match args.category.as_deref() {
        Some(name) => vec![parse_category(name)?],
        None => OptionCategory::ALL.to_vec(),
    };
    print!("{}", render(&selected));
    Ok(())
}

fn parse_category(name: &str) -> Result<OptionCategory> {
    OptionCategory::from_name(name).ok_or_else(|| {
        let known: Vec<_> = OptionCategory::ALL.iter().map(|c| c.name()).collect();
        CliError::Config(format!(
            "Unknown option category '{name}'. Expected one of: {}",
            known.join(", ")
        ))
    })
}

fn render(categories: &[OptionCategory]) -> String {
    let mut out = String::new();
    for (i, &category) in categories.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        render_category(&mut out, catalog::category(category));
    }
    out
}

fn render_category(out: &mut String, spec: &CategorySpec) {
    let _ = writeln!(out, "{}:", spec.category);
    for option in spec.options {
        let default = match option.default {
            Some(text) => format!("default: {text}"),
            None => "required".to_string(),
        };
        let _ = writeln!(out, "  {} ({default})", option.name);
        let _ = writeln!(out, "      {}", option.description);
        if !option.long_description.is_empty() {
            let _ = writeln!(out, "      {}", option.long_description);
        }
    }
}
