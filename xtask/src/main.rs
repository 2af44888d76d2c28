use anyhow::Context;
use clap::{Parser, Subcommand};
use fs_err as fs;
use std::process::Command as ProcessCommand;

#[derive(Debug, Parser)]
#[command(name = "xtask", about = "Workspace helper tasks")]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print schema identifiers used by shipwright.
    PrintSchemas,
    /// Create an empty artifacts layout (artifacts/<tool>/ placeholders).
    InitArtifacts {
        #[arg(long, default_value = "artifacts")]
        dir: String,
    },
    /// Run the golden fixture suite.
    CheckFixtures,
    /// Validate a shipwright plan artifact against the JSON schema.
    Validate {
        #[arg(long, default_value = "artifacts/shipwright/plan.json")]
        plan: String,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.cmd {
        Command::PrintSchemas => {
            println!("{}", shipwright_types::schema::SHIPWRIGHT_PLAN_V1);
            println!("{}", shipwright_types::schema::SHIPWRIGHT_REPORT_V1);
            println!("{}", shipwright_types::schema::SHIPWRIGHT_FINGERPRINTS_V1);
            println!("{}", shipwright_types::schema::LINT_REPORT_V1);
        }
        Command::InitArtifacts { dir } => {
            fs::create_dir_all(&dir).with_context(|| format!("create {dir}"))?;
            for t in ["tslint", "shipwright"] {
                fs::create_dir_all(format!("{dir}/{t}"))?;
            }
            println!("initialized {dir}/{{tslint,shipwright}}");
        }
        Command::CheckFixtures => {
            let status = ProcessCommand::new("cargo")
                .args([
                    "test",
                    "-p",
                    "shipwright-domain",
                    "--test",
                    "golden_fixtures",
                ])
                .status()
                .context("run golden fixture suite")?;
            if !status.success() {
                anyhow::bail!("check-fixtures failed");
            }
        }
        Command::Validate { plan } => {
            let schema_str = include_str!("../schemas/shipwright.plan.v1.json");
            let schema: serde_json::Value =
                serde_json::from_str(schema_str).context("parse bundled plan schema")?;
            let validator = jsonschema::validator_for(&schema).context("compile plan schema")?;

            let plan_str = fs::read_to_string(&plan).with_context(|| format!("read {plan}"))?;
            let instance: serde_json::Value =
                serde_json::from_str(&plan_str).with_context(|| format!("parse {plan}"))?;

            let errors: Vec<String> = validator
                .iter_errors(&instance)
                .map(|e| format!("{}: {}", e.instance_path(), e))
                .collect();
            if !errors.is_empty() {
                for error in &errors {
                    eprintln!("{error}");
                }
                anyhow::bail!("{} validation error(s) in {plan}", errors.len());
            }
            println!(
                "{plan} is valid {}",
                shipwright_types::schema::SHIPWRIGHT_PLAN_V1
            );
        }
    }
    Ok(())
}
