use std::path::PathBuf;

use anyhow::{Context, Result};
use comfy_table::Table;
use retain_model::ProcessorOptions;
use tracing::info;

use retain_cli::pipeline::{
    GenerationResult, OptionSources, classify_types, generate, load_snapshot, resolve_options,
    write_plan_json,
};

use crate::cli::{ClassifyArgs, GenerateArgs};
use crate::summary::{apply_table_style, dim_cell, header_cell};

pub fn generate_options(args: &GenerateArgs) -> Result<ProcessorOptions> {
    let sources = OptionSources {
        config: args.config.clone(),
        overrides: args.options.clone(),
        package: args.package.clone(),
        dependency: args.dependency,
        no_runtime: args.no_runtime,
    };
    resolve_options(&args.snapshot, &sources)
}

pub fn run_generate(args: &GenerateArgs, options: ProcessorOptions) -> Result<GenerationResult> {
    let out_dir = args.out_dir.clone().unwrap_or_else(|| {
        args.snapshot
            .parent()
            .map_or_else(|| PathBuf::from("generated"), |dir| dir.join("generated"))
    });
    info!(package = %options.package, dependency = options.is_dependency, "generating");
    let result = generate(&args.snapshot, options, &out_dir, args.dry_run)?;
    if let Some(path) = &args.plan_json {
        write_plan_json(path, &result.run).context("write plan json")?;
    }
    Ok(result)
}

pub fn run_classify(args: &ClassifyArgs) -> Result<()> {
    let snapshot = args
        .snapshot
        .as_deref()
        .map(load_snapshot)
        .transpose()?;
    let rows = classify_types(&args.types, snapshot.as_ref())?;

    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Type"),
        header_cell("Category"),
        header_cell("Accessor"),
        header_cell("Class token"),
    ]);
    apply_table_style(&mut table);
    for (ty, classification) in rows {
        let accessor = match classification.suffix() {
            Some(suffix) => format!("put{suffix} / get{suffix}").into(),
            None => dim_cell("-"),
        };
        let token = match &classification.class_token {
            Some(token) => token.into(),
            None => dim_cell("-"),
        };
        table.add_row(vec![
            ty.to_string().into(),
            classification.category.as_str().into(),
            accessor,
            token,
        ]);
    }
    println!("{table}");
    Ok(())
}
