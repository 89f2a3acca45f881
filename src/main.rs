use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use grelly::changelog::FileChangelog;
use grelly::cli::{self, ReleaseOptions};
use grelly::config::{self, BasePolicy, ConfigOverrides};
use grelly::domain::VersionBump;
use grelly::git::Git2Repository;
use grelly::resolver::VersionResolver;
use grelly::ui;
use grelly::GrellyError;

#[derive(clap::Parser)]
#[command(
    name = "grelly",
    version,
    about = "Derive a semantic version from branch names, tags and release commits"
)]
struct Args {
    #[arg(short = 'C', long = "git", default_value = ".", help = "Repository location")]
    git: PathBuf,

    #[arg(long, help = "Custom configuration file path")]
    config: Option<PathBuf>,

    #[arg(short, long, help = "Create the next release: tag, changelog entry")]
    release: bool,

    #[arg(long, requires = "release", help = "Increment MAJOR instead of MINOR")]
    major: bool,

    #[arg(long, requires = "release", help = "Also create a release commit and tag it")]
    commit: bool,

    #[arg(long, requires = "release", help = "Preview the release without making changes")]
    dry_run: bool,

    #[arg(long, value_name = "PATTERN", help = "Release branch pattern")]
    branch_pattern: Option<String>,

    #[arg(long, value_name = "PATTERN", help = "Version tag pattern")]
    tag_pattern: Option<String>,

    #[arg(long, value_name = "PATTERN", help = "Release commit message pattern")]
    release_pattern: Option<String>,

    #[arg(long, value_name = "FILE", help = "Changelog file, relative to the repository")]
    changelog: Option<PathBuf>,

    #[arg(long, value_enum, help = "Base commit policy when the branch names the version")]
    base_policy: Option<BasePolicy>,

    #[arg(long, help = "Add a pre-release suffix on feature and fix branches")]
    branch_suffix: bool,

    #[arg(long, help = "Explain where the version came from")]
    explain: bool,

    #[arg(short, long, action = clap::ArgAction::Count, help = "More log output (-v, -vv)")]
    verbose: u8,
}

impl Args {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            branch_pattern: self.branch_pattern.clone(),
            tag_pattern: self.tag_pattern.clone(),
            release_pattern: self.release_pattern.clone(),
            changelog: self.changelog.clone(),
            base_policy: self.base_policy,
            branch_suffix: self.branch_suffix,
            commit: self.commit,
        }
    }
}

fn main() {
    let args = Args::parse();
    init_logging(args.verbose);

    if let Err(err) = run(&args) {
        ui::display_error(&err.to_string());
        let code = match err.downcast_ref::<GrellyError>() {
            Some(grelly_err) => {
                if let GrellyError::ChangelogIo { path, tag, .. } = grelly_err {
                    ui::display_changelog_recovery(tag, path);
                }
                grelly_err.exit_code()
            }
            None => 1,
        };
        std::process::exit(code);
    }
}

fn init_logging(verbose: u8) {
    let filter = EnvFilter::try_from_env("GRELLY_LOG").unwrap_or_else(|_| {
        EnvFilter::new(match verbose {
            0 => "warn",
            1 => "info",
            _ => "debug",
        })
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(args: &Args) -> Result<()> {
    // Patterns are validated before the repository is opened
    let mut config = config::load_config(args.config.as_deref(), &args.git)?;
    config.apply(args.overrides());
    let resolver = VersionResolver::from_config(&config)?;
    debug!(?config, "Loaded configuration");

    let repo = Git2Repository::open(&args.git)?;

    if !args.release {
        let resolved = cli::run_resolve(&resolver, &repo)?;
        for warning in &resolved.warnings {
            ui::display_warning(warning);
        }
        if args.explain {
            ui::display_provenance(&resolved);
        }
        ui::display_version(&resolved);
        return Ok(());
    }

    let changelog = match repo.workdir() {
        Some(dir) => dir.join(&config.release.changelog),
        None => config.release.changelog.clone(),
    };
    let options = ReleaseOptions {
        bump: if args.major {
            VersionBump::Major
        } else {
            VersionBump::Minor
        },
        commit: config.release.commit,
        dry_run: args.dry_run,
        changelog,
    };

    let outcome = cli::run_release(&resolver, &repo, &FileChangelog, &options)?;
    let plan = &outcome.plan;
    for warning in &plan.previous.warnings {
        ui::display_warning(warning);
    }
    if args.explain {
        ui::display_provenance(&plan.previous);
    }

    if options.dry_run {
        ui::display_release_plan(plan);
    } else {
        if let Some(commit) = outcome.release_commit {
            ui::display_success(&format!(
                "Created release commit {} '{}'",
                commit, plan.commit_message
            ));
        }
        ui::display_success(&format!("Created tag: {}", plan.tag));
        ui::display_status(&format!(
            "Added {} commits to {}",
            plan.commits.len(),
            options.changelog.display()
        ));
    }
    println!("{}", plan.version);

    Ok(())
}
