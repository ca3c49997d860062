use clap::{Parser, Subcommand};
use postmill::{config, generate, manage, output, scan, sitemap};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "postmill")]
#[command(about = "Markdown blog engine: post index, static pages, sitemap")]
#[command(long_about = "\
Markdown blog engine: post index, static pages, sitemap

Each post is a Markdown file with a frontmatter block:

  posts/
  ├── index.json                  # Written by `postmill index`
  ├── hello-world.md              # slug = file stem
  └── images/                     # Copied into the built site

  ---
  title: Hello, World             # Required, posts without one are skipped
  date: 2025-01-15                # ISO-8601, sorts newest first
  excerpt: First post.            # Defaults to the start of the body
  tags:
    - Meta                        # Or inline: tags: meta, intro
  ---

Run 'postmill gen-config' to generate a documented blog.toml.")]
#[command(version)]
struct Cli {
    /// Project root containing blog.toml
    #[arg(long, default_value = ".", global = true)]
    root: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Scan posts and write index.json
    Index,
    /// Write index.json, then render HTML pages, copy images and write the sitemap
    Build,
    /// Scan posts and report problems without writing anything
    Check,
    /// Create a new post from the starter template
    New {
        /// Post title; the file name is derived from it
        title: String,
    },
    /// Rename posts to the slug of their title
    Slugify {
        /// Perform the renames (default is a dry run)
        #[arg(long)]
        apply: bool,
        /// Also strip a stray `.md` suffix from the title value
        #[arg(long)]
        clean_title: bool,
    },
    /// Print a stock blog.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if let Command::GenConfig = cli.command {
        print!("{}", config::stock_config_toml());
        return Ok(());
    }

    let site_config = config::load_config(&cli.root)?;
    let posts_dir = cli.root.join(&site_config.posts_dir);
    let output_dir = cli.root.join(&site_config.output_dir);

    match cli.command {
        Command::Index => {
            let scanned = scan::scan(&posts_dir, &site_config)?;
            output::print_scan_output(&scanned);
            let index_path = scan::write_index(&posts_dir, &scanned.entries())?;
            output::print_index_written(&index_path, scanned.posts.len());
        }
        Command::Build => {
            println!("==> Stage 1: Scanning {}", posts_dir.display());
            let scanned = scan::scan(&posts_dir, &site_config)?;
            output::print_scan_output(&scanned);
            let index_path = scan::write_index(&posts_dir, &scanned.entries())?;
            output::print_index_written(&index_path, scanned.posts.len());

            println!("==> Stage 2: Generating HTML → {}", output_dir.display());
            let report = generate::generate(&scanned, &site_config, &posts_dir, &output_dir)?;
            output::print_generate_output(&report);

            let sitemap_path = write_sitemap(&scanned, &site_config, &output_dir)?;
            output::print_sitemap_output(sitemap_path.as_deref());

            println!("==> Build complete: {}", output_dir.display());
        }
        Command::Check => {
            println!("==> Checking {}", posts_dir.display());
            if !posts_dir.is_dir() {
                println!("Warning: posts directory does not exist");
                return Ok(());
            }
            let scanned = scan::scan(&posts_dir, &site_config)?;
            output::print_scan_output(&scanned);
            if scanned.skipped.is_empty() {
                println!("==> Posts are valid");
            } else {
                println!("==> {} post(s) will be skipped", scanned.skipped.len());
            }
        }
        Command::New { title } => {
            let today = chrono::Local::now().date_naive();
            let path = manage::new_post(&posts_dir, &title, &site_config.site.author, today)?;
            output::print_new_post(&path);
        }
        Command::Slugify { apply, clean_title } => {
            let plans = manage::plan_renames(&posts_dir)?;
            if apply {
                manage::apply_renames(&posts_dir, &plans, clean_title)?;
            }
            output::print_rename_plan(&plans, apply);
        }
        Command::GenConfig => {}
    }

    Ok(())
}

/// Write `sitemap.xml` when a site URL is configured.
fn write_sitemap(
    scanned: &scan::Scan,
    site_config: &config::SiteConfig,
    output_dir: &Path,
) -> std::io::Result<Option<PathBuf>> {
    let Some(base_url) = site_config.base_url() else {
        return Ok(None);
    };
    let xml = sitemap::build_sitemap(&scanned.entries(), base_url);
    sitemap::write_sitemap(output_dir, &xml).map(Some)
}
