use clap::Parser;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;

	let args = procura_api::Args::parse();

	procura_api::run(args).await
}
