//! Provision an ambulance document so its waiting list can be used

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;

use ambulance_core::{
    Ambulance, AmbulanceService, DocumentStore, MongoDocumentStore, NewAmbulance, StoreConfig,
};

/// Arguments for the seed command
#[derive(Parser, Debug)]
pub struct SeedArgs {
    /// Ambulance id (generated when omitted)
    #[arg(long)]
    pub id: Option<String>,

    /// Display name of the ambulance
    #[arg(long)]
    pub name: String,

    /// Room the ambulance is located in
    #[arg(long)]
    pub room_number: Option<String>,
}

/// Create the ambulance in MongoDB and print it as JSON
pub async fn run_seed(args: SeedArgs) -> Result<()> {
    let store: Arc<dyn DocumentStore<Ambulance>> =
        Arc::new(MongoDocumentStore::new(StoreConfig::from_env()));
    let service = AmbulanceService::new(Arc::clone(&store));

    let created = service
        .create(NewAmbulance {
            id: args.id,
            name: Some(args.name),
            room_number: args.room_number,
        })
        .await;

    // Release the connection whatever the outcome
    if let Err(e) = store.disconnect().await {
        tracing::warn!("failed to disconnect from store: {}", e);
    }

    let ambulance = created.context("Failed to create ambulance")?;
    println!("{}", serde_json::to_string_pretty(&ambulance)?);
    Ok(())
}
