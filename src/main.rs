use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use mockup_publisher::settings::{ACCESS_KEY_VAR, BUCKET_VAR, REGION_VAR, SECRET_KEY_VAR};
use mockup_publisher::{
    FilePayload, FsStorage, IdentityMap, PublisherBuilder, Settings, Storage, UploadResult,
};

/// Publish an HTML mockup and its assets to S3 and print the shareable URL.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Who is uploading (see --list-users)
    #[arg(short, long, required_unless_present = "list_users")]
    user: Option<String>,

    /// HTML document, written at the root of the user's folder
    #[arg(long, value_name = "FILE")]
    html: Option<PathBuf>,

    /// Supporting files (CSS, JS, images), grouped under the project folder
    #[arg(value_name = "FILES")]
    files: Vec<PathBuf>,

    /// Project folder name; detected from the HTML when omitted
    #[arg(short, long, value_name = "NAME")]
    folder: Option<String>,

    /// Write into this local directory instead of S3
    #[arg(long, value_name = "DIR")]
    output_dir: Option<PathBuf>,

    /// Print the configured users and exit
    #[arg(long)]
    list_users: bool,

    #[arg(long, env = "S3_BUCKET_NAME")]
    bucket: Option<String>,

    #[arg(long, env = "AWS_REGION")]
    region: Option<String>,

    #[arg(long, env = "AWS_ACCESS_KEY_ID", hide_env_values = true)]
    access_key_id: Option<String>,

    #[arg(long, env = "AWS_SECRET_ACCESS_KEY", hide_env_values = true)]
    secret_access_key: Option<String>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<ExitCode> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("warn,mockup_publisher=info")),
        )
        .init();

    let args = Args::parse();

    let identities = IdentityMap::from_env()?;

    if args.list_users {
        for label in identities.labels() {
            let prefix = identities.prefix_for(label).unwrap_or_default();
            println!("{label}\t{prefix}/");
        }
        return Ok(ExitCode::SUCCESS);
    }

    let settings = match Settings::new(
        args.bucket.clone(),
        args.region.clone(),
        args.access_key_id.clone(),
        args.secret_access_key.clone(),
    ) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("{e}");
            eprintln!("Please set the following environment variables:");
            eprintln!("  {BUCKET_VAR}=your-bucket-name");
            eprintln!("  {ACCESS_KEY_VAR}=your-access-key");
            eprintln!("  {SECRET_KEY_VAR}=your-secret-key");
            eprintln!("  {REGION_VAR}=us-east-1  # optional, defaults to us-east-1");
            return Ok(ExitCode::from(2));
        }
    };

    if args.html.is_none() && args.files.is_empty() {
        eprintln!("Please provide at least one file.");
        return Ok(ExitCode::from(2));
    }

    if let Some(dir) = &args.output_dir {
        let builder = PublisherBuilder::new(FsStorage::new(dir), settings).identities(identities);
        return run(builder, &args).await;
    }

    #[cfg(feature = "s3")]
    {
        let storage = mockup_publisher::S3Storage::from_settings(&settings).await;
        let builder = PublisherBuilder::new(storage, settings).identities(identities);
        run(builder, &args).await
    }

    #[cfg(not(feature = "s3"))]
    {
        anyhow::bail!("built without the `s3` feature; pass --output-dir")
    }
}

async fn run<S: Storage>(builder: PublisherBuilder<S>, args: &Args) -> anyhow::Result<ExitCode> {
    let publisher = builder.build();
    let user = args.user.as_deref().context("--user is required")?;

    let html = args.html.as_ref().map(FilePayload::from_path);
    let files: Vec<FilePayload> = args.files.iter().map(FilePayload::from_path).collect();

    let result = publisher
        .upload_session(user, html.as_ref(), &files, args.folder.as_deref())
        .await?;

    report(&result);
    Ok(if result.nothing_uploaded() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}

fn report(result: &UploadResult) {
    if let Some(folder) = &result.folder {
        println!("Folder: {} ({:?})", folder.name, folder.source);
    }

    if result.nothing_uploaded() {
        println!("No files were uploaded successfully.");
    } else {
        println!(
            "Successfully uploaded {} file(s) to {}.",
            result.uploaded.len(),
            result.target.bucket
        );
        if let Some(url) = &result.html_url {
            println!();
            println!("HTML file URL:");
            println!("  {url}");
        }
        println!();
        println!("All uploaded files:");
        for url in result.urls() {
            println!("  {url}");
        }
    }

    if !result.errors.is_empty() {
        println!();
        println!("Failed:");
        for failure in &result.errors {
            println!("  {}: {}", failure.name, failure.error);
        }
    }
}
