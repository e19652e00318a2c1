//! tnm store command implementations.

use std::path::PathBuf;

use crate::cli::context::Context;
use crate::error::{Error, Result};
use crate::model::Store;
use crate::output::{emit_success, HumanOutput, OutputOptions};

pub struct ListOptions {
    pub region: Option<String>,
    pub root: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

pub struct ShowOptions {
    pub id: String,
    pub root: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

#[derive(serde::Serialize)]
struct StoreListOutput {
    total: usize,
    stores: Vec<Store>,
}

pub fn run_list(options: ListOptions) -> Result<()> {
    let ctx = Context::load(options.root, None)?;

    let stores: Vec<Store> = match options.region.as_deref() {
        Some(region_id) => {
            if ctx.directory.region_by_id(region_id).is_none() {
                return Err(Error::RegionNotFound(region_id.to_string()));
            }
            ctx.directory
                .stores_by_region(region_id)
                .into_iter()
                .cloned()
                .collect()
        }
        None => ctx.directory.stores.clone(),
    };

    let output = StoreListOutput {
        total: stores.len(),
        stores: stores.clone(),
    };

    let mut human = HumanOutput::new("Stores");
    human.push_summary("Total", stores.len().to_string());
    for store in &stores {
        let state = store.state.as_deref().unwrap_or("--");
        human.push_detail(format!(
            "{} {} ({}, {}) region {}",
            store.id, store.name, store.city, state, store.region_id
        ));
    }

    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "store list",
        &output,
        Some(&human),
    )
}

pub fn run_show(options: ShowOptions) -> Result<()> {
    let ctx = Context::load(options.root, None)?;
    let store = ctx
        .directory
        .store_by_id(options.id.trim())
        .ok_or_else(|| Error::StoreNotFound(options.id.clone()))?
        .clone();

    let mut human = HumanOutput::new(format!("Store {}", store.id));
    human.push_summary("Name", store.name.clone());
    human.push_summary("City", store.city.clone());
    if let Some(state) = store.state.as_deref() {
        human.push_summary("State", state.to_string());
    }
    human.push_summary("Region", store.region_id.clone());

    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "store show",
        &store,
        Some(&human),
    )
}
