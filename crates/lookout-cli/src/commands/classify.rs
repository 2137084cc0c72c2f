use serde::Serialize;

use lookout_local::classify::{Classification, MenuItem};

use crate::cli::GlobalFlags;
use crate::cli::root_commands::ClassifyArgs;
use crate::output::output;

#[derive(Serialize)]
struct ClassifyResponse {
    #[serde(flatten)]
    classification: Classification,
    menu: Vec<MenuItem>,
}

pub fn handle(args: &ClassifyArgs, flags: &GlobalFlags) -> anyhow::Result<()> {
    let classification = lookout_local::classify(&args.text);
    let menu = classification.menu();
    output(
        &ClassifyResponse {
            classification,
            menu,
        },
        flags.format,
    )
}
