//! `fpkg-layer flatten` command

use anyhow::Result;

use crate::cli::FlattenArgs;
use fpkg_layer::core::resolved::load_forest;
use fpkg_layer::ops::{flatten, flatten_unique};

pub fn execute(args: FlattenArgs) -> Result<()> {
    let forest = load_forest(&args.tree)?;

    let declarations = if args.unique {
        flatten_unique(&forest)
    } else {
        flatten(&forest)
    };

    for id in declarations {
        println!("{}", id);
    }

    Ok(())
}
