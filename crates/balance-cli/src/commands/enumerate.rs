use std::error::Error;

use balance_core::Count;
use balance_partition::PartitionStore;
use clap::Args;
use serde::Serialize;

#[derive(Args, Debug)]
pub struct EnumerateArgs {
    /// Part sizes in ascending order, comma separated.
    #[arg(long, value_delimiter = ',', required = true)]
    pub parts: Vec<Count>,
    /// Emit JSON instead of one line per weighing.
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Serialize)]
struct Listed {
    pans: String,
    output: String,
    symmetric: bool,
}

pub fn run(args: &EnumerateArgs) -> Result<(), Box<dyn Error>> {
    let mut store = PartitionStore::new();
    let partition = store.intern_parts(args.parts.clone())?;
    let children = store.children_of(partition).to_vec();
    let listed: Vec<Listed> = children
        .iter()
        .map(|child| Listed {
            pans: store.describe_pans(partition, child),
            output: store.describe_weighing(partition, child),
            symmetric: child.symmetric,
        })
        .collect();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&listed)?);
        return Ok(());
    }
    println!("{}", store.describe_partition(partition));
    for (index, entry) in listed.iter().enumerate() {
        let mirror = if entry.symmetric { " (symmetric)" } else { "" };
        println!("{index:>4}  {}{mirror}  {}", entry.pans, entry.output);
    }
    println!("{} weighings", listed.len());
    Ok(())
}
