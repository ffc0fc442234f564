//! Writing a compiled [`DataPack`] to disk.
//!
//! Layout under the output directory:
//!
//! ```text
//! pack.mcmeta
//! data/<ns>/functions/<path>.mcfunction
//! data/<ns>/<kind>s/<path>.json
//! data/minecraft/tags/functions/load.json
//! data/minecraft/tags/functions/tick.json   (only with a tick function)
//! ```

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use quill_foundation::{
    DataPack, Error, Function, FunctionPath, LOAD_FUNCTION, Result, TICK_FUNCTION,
};
use serde_json::json;

use crate::config::{PackConfig, io_error};

/// Counts of files written by [`write_pack`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PackSummary {
    /// `.mcfunction` files, load and tick included.
    pub functions: usize,
    /// JSON resources.
    pub resources: usize,
}

/// Writes `pack` to the configured output directory, replacing any
/// previous `data/` tree there.
///
/// # Errors
///
/// Returns an I/O error naming the path that could not be written.
pub fn write_pack(pack: &DataPack, config: &PackConfig) -> Result<PackSummary> {
    let root = config.output_dir();
    let data = root.join("data");
    if data.exists() {
        fs::remove_dir_all(&data).map_err(|e| io_error(&data, &e))?;
    }
    fs::create_dir_all(&root).map_err(|e| io_error(&root, &e))?;

    let meta = json!({
        "pack": {
            "pack_format": config.pack_format,
            "description": config.description,
        }
    });
    write_json(&root.join("pack.mcmeta"), &meta)?;

    let namespace = pack.namespace();
    let functions_dir = data.join(namespace).join("functions");
    let mut summary = PackSummary::default();

    let load_path = FunctionPath::from_name(LOAD_FUNCTION);
    let load = Function::with_commands(load_path.clone(), pack.load_commands());
    write_function(&functions_dir, &load)?;
    summary.functions += 1;
    for function in pack.all_functions() {
        if *function.path() == load_path {
            continue;
        }
        write_function(&functions_dir, function)?;
        summary.functions += 1;
    }

    for (key, json) in pack.resources() {
        let path = data
            .join(namespace)
            .join(format!("{}s", key.kind))
            .join(format!("{}.json", key.path));
        write_text(&path, json)?;
        summary.resources += 1;
    }

    let tags = data.join("minecraft").join("tags").join("functions");
    let load_tag = json!({ "values": [load_path.resource_location(namespace)] });
    write_json(&tags.join("load.json"), &load_tag)?;
    if pack.tick_function().is_some() {
        let tick = FunctionPath::from_name(TICK_FUNCTION).resource_location(namespace);
        write_json(&tags.join("tick.json"), &json!({ "values": [tick] }))?;
    }

    log::info!(
        "wrote {} functions and {} resources to {}",
        summary.functions,
        summary.resources,
        root.display()
    );
    Ok(summary)
}

fn write_function(dir: &Path, function: &Function) -> Result<()> {
    let path = dir.join(format!("{}.mcfunction", function.path().as_str()));
    write_text(&path, &function.render())
}

fn write_json(path: &Path, value: &serde_json::Value) -> Result<()> {
    let text = serde_json::to_string_pretty(value)
        .map_err(|e| Error::internal(format!("cannot encode {}: {e}", path.display())))?;
    write_text(path, &text)
}

fn write_text(path: &Path, text: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| io_error(parent, &e))?;
    }
    let file = File::create(path).map_err(|e| io_error(path, &e))?;
    let mut writer = BufWriter::new(file);
    writer
        .write_all(text.as_bytes())
        .and_then(|()| writer.flush())
        .map_err(|e| io_error(path, &e))?;
    log::debug!("wrote {}", path.display());
    Ok(())
}
