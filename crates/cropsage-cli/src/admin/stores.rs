use clap::{Args, Subcommand};
use cropsage_api::AdminSession;
use cropsage_core::StoreRecord;

use super::StoreFields;

/// Sub-commands available under `admin stores`.
#[derive(Debug, Subcommand)]
pub enum StoreCommands {
    /// List every store
    List {
        #[arg(long)]
        json: bool,
    },
    /// Add a store
    Add(StoreFields),
    /// Change fields of an existing store
    Update {
        id: i64,
        #[command(flatten)]
        patch: StorePatch,
    },
    /// Delete a store
    Delete { id: i64 },
}

#[derive(Debug, Clone, Default, Args)]
pub struct StorePatch {
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub address: Option<String>,
    #[arg(long, allow_negative_numbers = true)]
    pub lat: Option<f64>,
    #[arg(long, allow_negative_numbers = true)]
    pub lng: Option<f64>,
    #[arg(long)]
    pub phone: Option<String>,
}

impl StorePatch {
    fn apply(self, store: &mut StoreRecord) {
        if let Some(name) = self.name {
            store.name = name;
        }
        if let Some(address) = self.address {
            store.address = address;
        }
        if let Some(lat) = self.lat {
            store.latitude = lat;
        }
        if let Some(lng) = self.lng {
            store.longitude = lng;
        }
        if let Some(phone) = self.phone {
            store.phone = phone;
        }
    }
}

/// # Errors
///
/// Returns an error if the store does not exist or a backend call fails.
pub(crate) async fn run_stores_admin(
    session: &mut AdminSession,
    command: StoreCommands,
) -> anyhow::Result<()> {
    match command {
        StoreCommands::List { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(session.stores())?);
                return Ok(());
            }
        }
        StoreCommands::Add(fields) => {
            let saved = session.save_store(&fields.into_record(None)).await?;
            println!("added store '{}'", saved.name);
        }
        StoreCommands::Update { id, patch } => {
            let mut store = session
                .stores()
                .iter()
                .find(|s| s.id == Some(id))
                .cloned()
                .ok_or_else(|| anyhow::anyhow!("store {id} not found"))?;
            patch.apply(&mut store);
            let saved = session.save_store(&store).await?;
            println!("updated store '{}'", saved.name);
        }
        StoreCommands::Delete { id } => {
            session.delete_store(id).await?;
            println!("deleted store {id}");
        }
    }

    print_stores(session.stores());
    Ok(())
}

fn print_stores(stores: &[StoreRecord]) {
    if stores.is_empty() {
        println!("no stores defined");
        return;
    }

    let header = format!("{:<6}{:<30}{:<22}{:<16}ADDRESS", "ID", "NAME", "LAT,LNG", "PHONE");
    println!("{header}");
    for store in stores {
        let id = store.id.map_or_else(|| "-".to_string(), |id| id.to_string());
        let position = format!("{:.4},{:.4}", store.latitude, store.longitude);
        println!(
            "{:<6}{:<30}{:<22}{:<16}{}",
            id,
            super::clip(&store.name, 28),
            position,
            store.phone,
            super::clip(&store.address, 50)
        );
    }
}
