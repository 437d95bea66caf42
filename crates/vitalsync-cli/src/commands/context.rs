//! Context command - print the system instruction sent with each chat turn.

use vitalsync_ai::prompt;
use vitalsync_core::seed;

pub(crate) fn run() -> miette::Result<()> {
    let profile = seed::initial_profile();
    let docs = seed::initial_documents();

    println!("{}", prompt::system_instruction(&profile, &docs).trim());

    Ok(())
}
