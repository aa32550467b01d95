use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use clap::{ArgAction, Parser, Subcommand};
use s3_explorer::{
    AppBuilder, AppConfig, AppServices, CredentialSource, S3Config, StorageBackend,
};
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;
use tracing::Level;

#[derive(Parser, Debug)]
#[command(name = "s3-explorer", version)]
#[command(about = "List, create and delete S3 buckets and objects", long_about = None)]
struct Cli {
    /// Storage backend type (s3 or memory)
    #[arg(long, env = "STORAGE_BACKEND", default_value = "s3")]
    storage_backend: String,

    /// S3 endpoint URL, e.g. http://localhost:4566 for LocalStack
    #[arg(long, env = "S3_ENDPOINT")]
    endpoint: Option<String>,

    /// S3 region
    #[arg(long, env = "S3_REGION", default_value = "us-east-1")]
    region: String,

    /// S3 access key
    #[arg(long, env = "S3_ACCESS_KEY")]
    access_key: Option<String>,

    /// S3 secret key
    #[arg(long, env = "S3_SECRET_KEY", hide_env_values = true)]
    secret_key: Option<String>,

    /// Address buckets by path instead of by subdomain
    #[arg(long, env = "S3_FORCE_PATH_STYLE", default_value_t = true, action = ArgAction::Set)]
    force_path_style: bool,

    /// Log level
    #[arg(long, env = "LOG_LEVEL", default_value = "warn")]
    log_level: String,

    /// Print listings as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Lists all buckets
    ListBuckets,

    /// Create a bucket
    CreateBucket {
        /// Name of the bucket to create
        #[arg(long)]
        bucket: String,
    },

    /// Delete a bucket
    DeleteBucket {
        /// Name of the bucket to delete
        #[arg(long)]
        bucket: String,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Lists all objects in a bucket
    ListObjects {
        /// Name of the bucket to list objects
        #[arg(long)]
        bucket: String,
    },

    /// Put an object into bucket
    PutObject {
        /// Name of the bucket to create object in
        #[arg(long)]
        bucket: String,
        /// Path to file that should be uploaded to bucket
        #[arg(long, value_parser = existing_file)]
        key: PathBuf,
        /// Object key to store under instead of the file name
        #[arg(long = "as")]
        object_key: Option<String>,
    },

    /// Delete an object from bucket
    DeleteObject {
        /// Name of the bucket to delete object from
        #[arg(long)]
        bucket: String,
        /// Key of the object to delete
        #[arg(long)]
        key: String,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Rename an object (copy, then delete the original)
    RenameObject {
        #[arg(long)]
        bucket: String,
        #[arg(long)]
        from: String,
        #[arg(long)]
        to: String,
    },

    /// Print a presigned URL for uploading an object directly
    Presign {
        #[arg(long)]
        bucket: String,
        #[arg(long)]
        key: String,
        /// URL lifetime in seconds
        #[arg(long, default_value_t = 3600)]
        expires: u64,
        /// Upload this file through the URL right away
        #[arg(long, value_parser = existing_file)]
        upload: Option<PathBuf>,
    },
}

fn existing_file(value: &str) -> Result<PathBuf, String> {
    let path = PathBuf::from(value);
    if path.is_file() {
        Ok(path)
    } else {
        Err(format!("File '{}' does not exist.", value))
    }
}

impl Cli {
    fn to_app_config(&self) -> Result<AppConfig> {
        let storage_backend = match self.storage_backend.as_str() {
            "memory" => StorageBackend::InMemory,
            "s3" => {
                let credentials = match (&self.access_key, &self.secret_key) {
                    (Some(access_key), Some(secret_key)) => CredentialSource::Static {
                        access_key_id: access_key.clone(),
                        secret_access_key: secret_key.clone(),
                    },
                    (None, None) => CredentialSource::Environment,
                    _ => bail!("--access-key and --secret-key must be given together"),
                };

                StorageBackend::S3(
                    S3Config::builder()
                        .maybe_endpoint(self.endpoint.clone())
                        .region(self.region.clone())
                        .credentials(credentials)
                        .force_path_style(self.force_path_style)
                        .build(),
                )
            }
            _ => bail!("Unknown storage backend: {}", self.storage_backend),
        };

        Ok(AppConfig { storage_backend })
    }

    fn log_level(&self) -> Level {
        self.log_level.parse().unwrap_or(Level::WARN)
    }

    fn init_logging(&self) {
        tracing_subscriber::fmt()
            .with_max_level(self.log_level())
            .with_writer(io::stderr)
            .init();
    }
}

fn print_row(out: &mut impl Write, item: &str, datetime: &DateTime<Utc>) -> io::Result<()> {
    writeln!(out, "{:<50} Creation time: {}", item, datetime)
}

fn confirm(prompt: &str, input: &mut impl BufRead, out: &mut impl Write) -> io::Result<bool> {
    write!(out, "{} [y/N]: ", prompt)?;
    out.flush()?;

    let mut answer = String::new();
    input.read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}

async fn upload_to_presigned_url(url: &str, path: &Path) -> Result<()> {
    if !url.starts_with("http") {
        bail!("direct upload needs an S3 backend, got URL '{}'", url);
    }

    let data = tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read '{}'", path.display()))?;

    reqwest::Client::new()
        .put(url)
        .body(data)
        .send()
        .await
        .context("Upload request failed")?
        .error_for_status()
        .context("Upload rejected by the backend")?;

    Ok(())
}

/// Execute one command. Returns whether the requested operation happened.
async fn run(
    command: Commands,
    json: bool,
    services: &AppServices,
    input: &mut impl BufRead,
    out: &mut impl Write,
) -> Result<bool> {
    let buckets = &services.bucket_use_cases;
    let objects = &services.object_use_cases;

    match command {
        Commands::ListBuckets => {
            let listed = buckets.get_buckets().await;
            if json {
                writeln!(out, "{}", serde_json::to_string_pretty(&listed)?)?;
            } else {
                for bucket in &listed {
                    print_row(out, &bucket.name, &bucket.creation_date)?;
                }
            }
            Ok(true)
        }
        Commands::CreateBucket { bucket } => {
            if buckets.create_bucket(&bucket).await {
                writeln!(out, "Bucket '{}' created", bucket)?;
                Ok(true)
            } else {
                writeln!(out, "Could NOT create bucket '{}'", bucket)?;
                Ok(false)
            }
        }
        Commands::DeleteBucket { bucket, yes } => {
            if !yes && !confirm(&format!("Delete bucket '{}'?", bucket), input, out)? {
                writeln!(out, "Delete Aborted!")?;
                return Ok(false);
            }
            if buckets.delete_bucket(&bucket).await {
                writeln!(out, "Bucket '{}' deleted", bucket)?;
                Ok(true)
            } else {
                writeln!(out, "Could NOT delete bucket '{}'", bucket)?;
                Ok(false)
            }
        }
        Commands::ListObjects { bucket } => {
            let listed = objects.get_objects(&bucket).await;
            if json {
                writeln!(out, "{}", serde_json::to_string_pretty(&listed)?)?;
            } else {
                for object in &listed {
                    print_row(out, &object.key, &object.last_modified)?;
                }
            }
            Ok(true)
        }
        Commands::PutObject {
            bucket,
            key,
            object_key,
        } => {
            let uploaded = match &object_key {
                Some(object_key) => objects
                    .try_upload_object_as(&bucket, object_key, &key)
                    .await
                    .is_ok(),
                None => objects.upload_object(&bucket, &key).await,
            };
            if uploaded {
                writeln!(out, "Object '{}' uploaded to '{}'.", key.display(), bucket)?;
            } else {
                writeln!(out, "Upload failed!")?;
            }
            Ok(uploaded)
        }
        Commands::DeleteObject { bucket, key, yes } => {
            if !yes && !confirm(&format!("Delete object '{}'?", key), input, out)? {
                writeln!(out, "Delete Aborted!")?;
                return Ok(false);
            }
            if objects.delete_object(&bucket, &key).await {
                writeln!(out, "Object '{}' deleted", key)?;
                Ok(true)
            } else {
                writeln!(out, "Could NOT delete object '{}' from '{}'", key, bucket)?;
                Ok(false)
            }
        }
        Commands::RenameObject { bucket, from, to } => {
            if objects.rename_object(&bucket, &from, &to).await {
                writeln!(out, "Object '{}' renamed to '{}'", from, to)?;
                Ok(true)
            } else {
                writeln!(out, "Could NOT rename object '{}'", from)?;
                Ok(false)
            }
        }
        Commands::Presign {
            bucket,
            key,
            expires,
            upload,
        } => {
            let Some(url) = objects
                .generate_presigned_url(&bucket, &key, Some(Duration::from_secs(expires)))
                .await
            else {
                writeln!(out, "Could NOT generate a presigned URL for '{}'", key)?;
                return Ok(false);
            };

            writeln!(out, "{}", url)?;
            if let Some(path) = upload {
                upload_to_presigned_url(&url, &path).await?;
                writeln!(out, "Object '{}' uploaded to '{}'.", path.display(), bucket)?;
            }
            Ok(true)
        }
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // Load .env file if it exists
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    cli.init_logging();

    let config = cli.to_app_config()?;
    let services = AppBuilder::new().with_config(config).build().await;

    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut out = io::stdout();

    let succeeded = run(cli.command, cli.json, &services, &mut input, &mut out).await?;
    Ok(if succeeded {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
