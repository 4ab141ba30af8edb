//! Command runner.
//!
//! [`execute`] loads the fixture named on the command line; [`render`] runs
//! one command against an already loaded registry and is what the
//! integration tests drive.

use anyhow::{anyhow, Context};
use msgprep_core::config::{Config, IdMode, IdsConfig};
use msgprep_core::{export, Exported, InsertMode, Registry, View};
use msgprep_fixtures::{load, AnySource, FixtureSource};
use serde_json::{json, Value};

use crate::cli::{Command, IdsArg, ViewArgs};

/// Result of one command: the JSON document to print and whether the run
/// counts as a success.
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome {
    pub output: Value,
    pub ok: bool,
}

impl Outcome {
    fn ok(output: Value) -> Self {
        Self { output, ok: true }
    }

    pub fn render(&self, pretty: bool) -> String {
        if pretty {
            format!("{:#}", self.output)
        } else {
            self.output.to_string()
        }
    }
}

/// Load the command's fixture and run it.
pub async fn execute(command: &Command, config: &Config) -> anyhow::Result<Outcome> {
    let target = command.target();
    let mode = if target.strict {
        InsertMode::Strict
    } else {
        config.registry.mode
    };
    let mut source = AnySource::from_arg(&target.fixture);
    let registry = load(&mut source, mode)
        .await
        .with_context(|| format!("loading fixture {}", source.describe()))?;
    render(command, &registry, config)
}

/// Run `command` against `registry`.
pub fn render(command: &Command, registry: &Registry, config: &Config) -> anyhow::Result<Outcome> {
    match command {
        Command::Keys(_) => Ok(Outcome::ok(registry.keys().collect::<Vec<_>>().into())),
        Command::Raw(args) => view(args, View::Raw, registry, config),
        Command::Packets(args) => view(args, View::Packets, registry, config),
        Command::Prepare(args) => view(args, View::Messages, registry, config),
        Command::Check(_) => Ok(check(&export_all(registry, config, None))),
    }
}

fn view(args: &ViewArgs, view: View, registry: &Registry, config: &Config) -> anyhow::Result<Outcome> {
    let exported = export_all(registry, config, args.ids);
    let mut output = exported.to_json(view);
    if let Some(key) = &args.key {
        output = output
            .get_mut(key.as_str())
            .map(Value::take)
            .ok_or_else(|| anyhow!("no record under key {key:?}"))?;
    }
    Ok(Outcome::ok(output))
}

fn check(exported: &Exported) -> Outcome {
    let failures: serde_json::Map<String, Value> = exported
        .failures()
        .map(|(key, err)| (key.to_string(), Value::String(err.to_string())))
        .collect();
    let ok = failures.is_empty();
    Outcome {
        output: json!({
            "records": exported.len(),
            "prepared": exported.len() - failures.len(),
            "failures": failures,
        }),
        ok,
    }
}

fn export_all(registry: &Registry, config: &Config, ids: Option<IdsArg>) -> Exported {
    let ids_config = match ids {
        None => config.ids.clone(),
        Some(choice) => IdsConfig {
            mode: match choice {
                IdsArg::Fixed => IdMode::Fixed,
                IdsArg::Sequential => IdMode::Sequential,
            },
            ..config.ids.clone()
        },
    };
    export(registry, &mut ids_config.source(), &config.preview)
}
