use clap::{App, AppSettings, Arg};

pub const SOURCE_ARG: &str = "source";
pub const DESTINATION_ARG: &str = "destination";
pub const QUIET_ARG: &str = "quiet";
pub const DEBUG_ARG: &str = "debug";
pub const REGION_ARG: &str = "region";
pub const ENDPOINT_ARG: &str = "endpoint";
pub const RR_ARG: &str = "rr";

const AFTER_HELP: &str = "\
A storage path looks like s3:bucket:/path/to/object, anything else is a local path.
Both source and destination are required, one must be a storage path and the other a local path.

EXAMPLES:
    s3cp s3:mybucket:/myfolder/backup.tar.gz /tmp
    s3cp s3:mybucket:/myfolder/backup.tar.gz /tmp/foobar.tar.gz
    s3cp --rr /tmp/backup.tar.gz s3:mybucket:/myfolder/";

pub fn app() -> App<'static, 'static> {
    App::new("s3cp")
        .bin_name("s3cp")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Uploads or downloads a file from an S3 bucket, using scp conventions")
        .after_help(AFTER_HELP)
        .setting(AppSettings::ColorAuto)
        .setting(AppSettings::StrictUtf8)
        .arg(
            Arg::with_name(QUIET_ARG)
                .long("quiet")
                .short("q")
                .help("Suppress output"),
        )
        .arg(
            Arg::with_name(DEBUG_ARG)
                .long("debug")
                .help("Print debug information"),
        )
        .arg(
            Arg::with_name(REGION_ARG)
                .long("region")
                .value_name("name")
                .default_value(crate::config::DEFAULT_REGION)
                .help("The AWS region holding the target bucket"),
        )
        .arg(
            Arg::with_name(ENDPOINT_ARG)
                .long("endpoint")
                .value_name("url")
                .env("S3CP_ENDPOINT")
                .help("[advanced] use an S3 compatible service at this url"),
        )
        .arg(
            Arg::with_name(RR_ARG)
                .long("rr")
                .help("Store uploads with reduced redundancy, no effect on download"),
        )
        .arg(
            Arg::with_name(SOURCE_ARG)
                .required(true)
                .index(1)
                .help("A local path or a storage path like s3:bucket:/path"),
        )
        .arg(
            Arg::with_name(DESTINATION_ARG)
                .required(true)
                .index(2)
                .help("Same format as source"),
        )
}
