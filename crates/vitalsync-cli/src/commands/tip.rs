//! Tip command - print one personalized health tip.

pub(crate) async fn run() -> miette::Result<()> {
    let session = super::connect()?;
    println!("{}", session.daily_tip().await);
    Ok(())
}
