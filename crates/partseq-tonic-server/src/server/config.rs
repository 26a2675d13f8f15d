use std::{path::PathBuf, time::Duration};

use anyhow::bail;
use clap::Parser;
use partseq::{
    AllocatorConfig, DEFAULT_IDENTIFIER_FIELD, DEFAULT_NON_PRIMARY_VALUE, DEFAULT_PARTITION_FIELD,
    DEFAULT_VARIANT_FIELD, FieldNames,
};

/// Runtime configuration for the `partseq-tonic-server` binary.
///
/// All values are parsed from CLI arguments or environment variables. The field
/// defaults match the field names of the study's data collection instrument.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "partseq-tonic-server",
    version,
    about = "A gRPC service that allocates participant IDs on record save"
)]
pub struct CliArgs {
    /// JSON file holding the project's records.
    ///
    /// Environment variable: `DATA_FILE`
    #[arg(long, env = "DATA_FILE")]
    pub data_file: PathBuf,

    /// Project this server allocates for. Save events for any other project
    /// are rejected.
    ///
    /// Environment variable: `PROJECT_ID`
    #[arg(long, env = "PROJECT_ID", default_value_t = String::from("1"))]
    pub project_id: String,

    /// Field that identifies a record.
    ///
    /// Environment variable: `RECORD_ID_FIELD`
    #[arg(long, env = "RECORD_ID_FIELD", default_value_t = String::from("record_id"))]
    pub record_id_field: String,

    /// Field holding the partition key (site code).
    ///
    /// Environment variable: `PARTITION_FIELD`
    #[arg(long, env = "PARTITION_FIELD", default_value_t = String::from(DEFAULT_PARTITION_FIELD))]
    pub partition_field: String,

    /// Field holding the variant flag (consent status).
    ///
    /// Environment variable: `VARIANT_FIELD`
    #[arg(long, env = "VARIANT_FIELD", default_value_t = String::from(DEFAULT_VARIANT_FIELD))]
    pub variant_field: String,

    /// Field the participant ID is written to.
    ///
    /// Environment variable: `IDENTIFIER_FIELD`
    #[arg(long, env = "IDENTIFIER_FIELD", default_value_t = String::from(DEFAULT_IDENTIFIER_FIELD))]
    pub identifier_field: String,

    /// Variant-flag value that marks a record as non-primary (`-NC` suffix).
    ///
    /// Environment variable: `NON_PRIMARY_VALUE`
    #[arg(long, env = "NON_PRIMARY_VALUE", default_value_t = String::from(DEFAULT_NON_PRIMARY_VALUE))]
    pub non_primary_value: String,

    /// Also write skipped save events to the audit log.
    ///
    /// Environment variable: `VERBOSE_LOGGING`
    #[arg(long, env = "VERBOSE_LOGGING", default_value_t = false)]
    pub verbose_logging: bool,

    /// Number of allocation worker threads.
    ///
    /// Workers share one set of partition locks, so any number is safe; more
    /// than one only helps when events for different partitions arrive
    /// together.
    ///
    /// Environment variable: `NUM_WORKERS`
    #[arg(long, env = "NUM_WORKERS", default_value_t = 1)]
    pub num_workers: usize,

    /// Capacity of each worker's request queue.
    ///
    /// Environment variable: `WORK_QUEUE_SIZE`
    #[arg(long, env = "WORK_QUEUE_SIZE", default_value_t = 64)]
    pub queue_size: usize,

    /// Seconds to wait for each worker to acknowledge shutdown.
    ///
    /// Environment variable: `SHUTDOWN_TIMEOUT`
    #[arg(long, env = "SHUTDOWN_TIMEOUT", default_value_t = 5)]
    pub shutdown_timeout: u64,

    /// Address to listen on (TCP or Unix socket path; use --uds for Unix socket).
    ///
    /// Example: "0.0.0.0:50061" or "/tmp/partseq.sock"
    ///
    /// Environment variable: `SERVER_ADDR`
    #[arg(long, env = "SERVER_ADDR", default_value_t = String::from("0.0.0.0:50061"))]
    pub server_addr: String,

    /// Listen on a Unix socket instead of TCP. If set, `SERVER_ADDR` must be a file path.
    #[arg(short, long, default_value_t = false)]
    pub uds: bool,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub data_file: PathBuf,
    pub project_id: String,
    pub record_id_field: String,
    pub allocator: AllocatorConfig,
    pub num_workers: usize,
    pub queue_size: usize,
    pub shutdown_timeout: Duration,
    pub server_addr: String,
    pub uds: bool,
}

impl TryFrom<CliArgs> for ServerConfig {
    type Error = anyhow::Error;

    fn try_from(args: CliArgs) -> Result<Self, Self::Error> {
        if args.num_workers == 0 {
            bail!("NUM_WORKERS must be greater than 0");
        }

        if args.queue_size == 0 {
            bail!("WORK_QUEUE_SIZE must be greater than 0");
        }

        if args.project_id.is_empty() {
            bail!("PROJECT_ID must not be empty");
        }

        let named = [
            ("RECORD_ID_FIELD", &args.record_id_field),
            ("PARTITION_FIELD", &args.partition_field),
            ("VARIANT_FIELD", &args.variant_field),
            ("IDENTIFIER_FIELD", &args.identifier_field),
        ];
        for (i, (var, field)) in named.iter().enumerate() {
            if field.is_empty() {
                bail!("{var} must not be empty");
            }
            if let Some((other, _)) = named[..i].iter().find(|(_, f)| f == field) {
                bail!("{var} and {other} both name the field `{field}`");
            }
        }

        let allocator = AllocatorConfig::default()
            .with_fields(FieldNames {
                partition_key: args.partition_field,
                variant_flag: args.variant_field,
                identifier: args.identifier_field,
            })
            .with_non_primary_value(args.non_primary_value)
            .with_verbose(args.verbose_logging);

        Ok(Self {
            data_file: args.data_file,
            project_id: args.project_id,
            record_id_field: args.record_id_field,
            allocator,
            num_workers: args.num_workers,
            queue_size: args.queue_size,
            shutdown_timeout: Duration::from_secs(args.shutdown_timeout),
            server_addr: args.server_addr,
            uds: args.uds,
        })
    }
}
