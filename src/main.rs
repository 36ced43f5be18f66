use std::io::{BufWriter, stdin, stdout};
use std::path::Path;

use clap::Parser;
use log::info;

use flooring::conf::Config;
use flooring::core::{CliArgs, setup_logging};
use flooring::service::FlooringService;
use flooring::view::{ConsoleIo, Controller};

fn main() -> anyhow::Result<()> {
    setup_logging();
    let args = CliArgs::parse();
    info!(args; "Flooring started.");

    let mut config = Config::load(args.config.as_deref().map(Path::new))?;
    if let Some(orders_dir) = &args.orders_dir {
        config.storage.orders_dir = orders_dir.into();
    }
    config.storage.prepare_orders_dir()?;
    info!(
        "orders in {}, products from {}, taxes from {}",
        config.storage.orders_dir.display(),
        config.storage.products_file.display(),
        config.storage.taxes_file.display()
    );

    let service = FlooringService::from_config(&config);
    let io = ConsoleIo::new(stdin().lock(), BufWriter::new(stdout().lock()));
    Controller::new(service, io).run()?;
    Ok(())
}
