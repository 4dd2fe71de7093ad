use clap::Parser;

use crate::pipeline::ArchiveVariant;

#[derive(Parser, Debug)]
#[command(name = "ccfetch")]
#[command(version)]
#[command(about = "Fetch documents from Common Crawl archives", long_about = None)]
#[command(after_help = "Examples:\n  \
  ccfetch CC-MAIN-2019-22 'https://innopolis.ru/*'       save every capture of a site\n  \
  ccfetch -t CC-MAIN-2019-22 example.com -d data/text    save extracted-text renditions\n  \
  ccfetch -q CC-MAIN-2019-22 'example.com/*'             no progress lines")]
pub struct Cli {
    /// Crawl database id, e.g. CC-MAIN-2019-22
    #[arg(value_name = "CRAWL")]
    pub crawl: String,

    /// URL or URL pattern to look up, e.g. 'https://innopolis.ru/*'
    #[arg(value_name = "URL_PATTERN")]
    pub url_pattern: String,

    /// Directory documents are written into (created if absent)
    #[arg(short = 'd', long = "output-dir", value_name = "DIR", default_value = "data")]
    pub output_dir: String,

    /// Fetch WET extracted-text records instead of full WARC records
    #[arg(short = 't', long = "text-only")]
    pub text_only: bool,

    /// Quiet mode (-qq => quieter)
    #[arg(short = 'q', action = clap::ArgAction::Count)]
    pub quiet: u8,

    /// Retry attempts per range request
    #[arg(long = "retries", value_name = "N", default_value_t = 3)]
    pub retries: u32,

    /// Crawl index service endpoint
    #[arg(
        long = "index-url",
        value_name = "URL",
        default_value = "http://index.commoncrawl.org"
    )]
    pub index_url: String,

    /// Archive storage endpoint
    #[arg(
        long = "storage-url",
        value_name = "URL",
        default_value = "https://commoncrawl.s3.amazonaws.com"
    )]
    pub storage_url: String,
}

impl Cli {
    pub fn variant(&self) -> ArchiveVariant {
        if self.text_only {
            ArchiveVariant::TextOnly
        } else {
            ArchiveVariant::Full
        }
    }

    pub fn is_quiet(&self) -> bool {
        self.quiet > 0
    }

    pub fn is_very_quiet(&self) -> bool {
        self.quiet > 1
    }
}
