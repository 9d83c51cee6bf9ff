//! taskmate init command implementation
//!
//! Writes a default config file and an empty task store, leaving existing
//! files alone.

use std::path::PathBuf;

use crate::cli::Context;
use crate::config::Config;
use crate::error::Result;
use crate::output::{emit_success, HumanOutput};
use crate::store::{FileStore, TaskStore};

#[derive(serde::Serialize)]
struct InitReport {
    config_path: PathBuf,
    store_path: PathBuf,
    created: InitCreated,
}

#[derive(serde::Serialize)]
struct InitCreated {
    config: bool,
    store: bool,
}

pub fn run(ctx: &Context) -> Result<()> {
    let created_config = ensure_config(ctx)?;
    let store = ctx.open_store();
    let created_store = ensure_store(&store)?;

    let report = InitReport {
        config_path: ctx.config_path.clone(),
        store_path: store.path().to_path_buf(),
        created: InitCreated {
            config: created_config,
            store: created_store,
        },
    };

    let mut created_items = Vec::new();
    if created_config {
        created_items.push(ctx.config_path.display().to_string());
    }
    if created_store {
        created_items.push(store.path().display().to_string());
    }

    let header = if created_items.is_empty() {
        "taskmate init: nothing to do".to_string()
    } else {
        "taskmate init: initialized".to_string()
    };

    let mut human = HumanOutput::new(header);
    human.push_summary("config", ctx.config_path.display().to_string());
    human.push_summary("store", store.path().display().to_string());
    human.push_summary(
        "created",
        if created_items.is_empty() {
            "none".to_string()
        } else {
            created_items.join(", ")
        },
    );
    human.push_next_step("taskmate say add buy milk");
    human.push_next_step("taskmate chat");

    emit_success(ctx.output, "init", &report, Some(&human))
}

fn ensure_config(ctx: &Context) -> Result<bool> {
    if ctx.config_path.exists() {
        return Ok(false);
    }
    Config::default().save(&ctx.config_path)?;
    Ok(true)
}

fn ensure_store(store: &FileStore) -> Result<bool> {
    if store.read_raw()?.is_some() {
        return Ok(false);
    }
    store.save(&[])?;
    Ok(true)
}
