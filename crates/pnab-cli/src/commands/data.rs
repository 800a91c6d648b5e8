use crate::cli::{DataArgs, DataCommands};
use crate::data::DataManager;
use crate::error::Result;
use tracing::info;

pub fn run(args: DataArgs) -> Result<()> {
    match args.command {
        DataCommands::Path => handle_path(),
        DataCommands::SetPath { path } => {
            let stored = DataManager::set_custom_path(&path)?;
            info!("Custom data path set to {:?}", &stored);
            println!("Data directory set to: {}", stored.display());
            if !stored.exists() {
                println!("Note: the directory does not exist yet.");
            }
            Ok(())
        }
        DataCommands::ResetPath => {
            DataManager::reset_path()?;
            info!("Custom data path removed.");
            handle_path()
        }
    }
}

fn handle_path() -> Result<()> {
    let manager = DataManager::new()?;
    println!("{}", manager.get_data_path().display());
    if !manager.has_library() {
        println!(
            "Warning: no nucleobase library found at {}",
            manager.library_path().display()
        );
    }
    Ok(())
}
