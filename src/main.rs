use std::fs;
use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use docs_sync::config::{self, Config};
use docs_sync::domain::{CodeOwners, MessageTemplate};
use docs_sync::git::Git2Repository;
use docs_sync::github::HttpGithub;
use docs_sync::labeler::{self, ProcessOptions};
use docs_sync::tagger::Tagger;
use docs_sync::{cloner, harness, ui};

#[derive(Parser)]
#[command(
    name = "docs-sync",
    about = "Keep a documentation repository in sync with its upstream project"
)]
struct Cli {
    #[arg(short, long, help = "Custom configuration file path", global = true)]
    config: Option<String>,

    #[arg(
        long,
        help = "Path to the documentation checkout",
        default_value = ".",
        global = true
    )]
    docs: PathBuf,

    #[arg(long, help = "Path to the upstream checkout", global = true)]
    upstream: Option<PathBuf>,

    #[arg(long, help = "Git remote name for both checkouts", global = true)]
    remote: Option<String>,

    #[arg(long, help = "Override remote name for the docs checkout", global = true)]
    docs_remote: Option<String>,

    #[arg(
        long,
        help = "Override remote name for the upstream checkout",
        global = true
    )]
    upstream_remote: Option<String>,

    #[arg(
        long,
        help = "Skip fetching repositories before tag operations",
        global = true
    )]
    no_fetch: bool,

    #[arg(short, long, help = "Silence status output", global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List upstream release tags that are not tagged here
    NewTags {
        #[arg(short, long = "branch", help = "Branches in which to search for tags")]
        branches: Vec<String>,
    },

    /// Print the docs commit that was current at an upstream release
    Hash {
        #[arg(short, long, help = "Tag name")]
        tag: String,

        #[arg(short, long, help = "Branch name; inferred from --tag by default")]
        branch: Option<String>,
    },

    /// Mirror all missing upstream release tags into the docs repo
    Tag {
        #[arg(short, long = "branch", help = "Branches in which to search for tags")]
        branches: Vec<String>,

        #[arg(long, help = "Create tags without pushing them")]
        no_push: bool,
    },

    /// Manually tag a release
    Mantag {
        #[arg(short, long, help = "Tag name")]
        tag: String,

        #[arg(short, long, help = "Commit or reference to tag")]
        r#ref: String,

        #[arg(short, long, help = "Branch name; inferred from --tag by default")]
        branch: Option<String>,

        #[arg(long, help = "Create the tag without pushing it")]
        no_push: bool,
    },

    /// Clone the upstream subtree needed for local docs builds
    CloneUpstream {
        #[arg(
            short,
            long,
            help = "Upstream branch to clone; defaults to the branch file"
        )]
        branch: Option<String>,

        #[arg(
            long,
            help = "Clone the remote default branch",
            conflicts_with = "branch"
        )]
        no_branch: bool,

        #[arg(long, help = "Upstream repository URL")]
        repo: Option<String>,

        #[arg(long, help = "Skip the clone when the subtree already looks current")]
        check: bool,
    },

    /// Triage an issue or pull request
    Label {
        #[command(subcommand)]
        target: LabelTarget,
    },

    /// Build or lint the documentation
    Build {
        #[command(subcommand)]
        step: BuildStep,
    },
}

#[derive(Subcommand)]
enum LabelTarget {
    /// Process a pull request
    Pr {
        number: u64,

        #[command(flatten)]
        opts: LabelOpts,
    },

    /// Process an issue
    Issue {
        number: u64,

        #[command(flatten)]
        opts: LabelOpts,
    },
}

#[derive(clap::Args)]
struct LabelOpts {
    #[arg(long, help = "Repository owner (organization or user)")]
    owner: Option<String>,

    #[arg(long, help = "Repository name")]
    repo: Option<String>,

    #[arg(long, help = "Run unauthenticated and perform no mutations")]
    dry_run: bool,

    #[arg(long, help = "Authenticate but perform no mutations")]
    authed_dry_run: bool,

    #[arg(long, help = "Process the ticket even when it is not open")]
    force_process_closed: bool,

    #[arg(long, help = "Detect new contributors via author_association metadata")]
    use_author_association: bool,
}

#[derive(Subcommand)]
enum BuildStep {
    /// Build the docs site
    Docs,

    /// Run lint checks
    Lint,
}

fn main() {
    let cli = Cli::parse();

    let config = match config::load_config(cli.config.as_deref()) {
        Ok(cfg) => cfg,
        Err(e) => {
            ui::display_error(&format!("Error loading config: {}", e));
            std::process::exit(1);
        }
    };

    if let Err(e) = run(&cli, &config) {
        ui::display_error(&e.to_string());
        std::process::exit(1);
    }
}

fn run(cli: &Cli, config: &Config) -> Result<()> {
    match &cli.command {
        Command::NewTags { branches } => new_tags_command(cli, config, branches),
        Command::Hash { tag, branch } => hash_command(cli, config, tag, branch.as_deref()),
        Command::Tag { branches, no_push } => tag_command(cli, config, branches, !*no_push),
        Command::Mantag {
            tag,
            r#ref,
            branch,
            no_push,
        } => mantag_command(cli, config, tag, r#ref, branch.as_deref(), !*no_push),
        Command::CloneUpstream {
            branch,
            no_branch,
            repo,
            check,
        } => clone_command(cli, config, branch.as_deref(), *no_branch, repo.as_deref(), *check),
        Command::Label { target } => match target {
            LabelTarget::Pr { number, opts } => label_command(cli, config, *number, opts, true),
            LabelTarget::Issue { number, opts } => {
                label_command(cli, config, *number, opts, false)
            }
        },
        Command::Build { step } => match step {
            BuildStep::Docs => Ok(harness::build_docs(&config.build, &cli.docs, cli.quiet)?),
            BuildStep::Lint => Ok(harness::lint(&config.build, &cli.docs, cli.quiet)?),
        },
    }
}

/// Open both repositories and resolve the effective remote names
fn open_repos(cli: &Cli, config: &Config) -> Result<(Git2Repository, Git2Repository)> {
    let docs = Git2Repository::open(&cli.docs)?;
    let upstream_path = cli
        .upstream
        .clone()
        .unwrap_or_else(|| PathBuf::from(&config.tagger.upstream_path));
    let upstream = Git2Repository::open(&upstream_path)?;
    Ok((docs, upstream))
}

fn remote_names(cli: &Cli, config: &Config) -> (String, String) {
    let fallback = || {
        cli.remote
            .clone()
            .unwrap_or_else(|| config.tagger.remote.clone())
    };
    let docs_remote = cli.docs_remote.clone().unwrap_or_else(fallback);
    let upstream_remote = cli.upstream_remote.clone().unwrap_or_else(fallback);
    (docs_remote, upstream_remote)
}

fn make_tagger<'a>(
    cli: &Cli,
    config: &Config,
    docs: &'a Git2Repository,
    upstream: &'a Git2Repository,
) -> Tagger<'a> {
    let (docs_remote, upstream_remote) = remote_names(cli, config);
    Tagger {
        docs,
        upstream,
        docs_remote,
        upstream_remote,
        message: MessageTemplate::new(config.tagger.message_template.clone()),
        quiet: cli.quiet,
    }
}

fn effective_branches(cli_branches: &[String], config: &Config) -> Vec<String> {
    if cli_branches.is_empty() {
        config.tagger.branches.clone()
    } else {
        cli_branches.to_vec()
    }
}

fn new_tags_command(cli: &Cli, config: &Config, branches: &[String]) -> Result<()> {
    let (docs, upstream) = open_repos(cli, config)?;
    let tagger = make_tagger(cli, config, &docs, &upstream);
    if !cli.no_fetch {
        tagger.fetch_all()?;
    }

    let mut missing = Vec::new();
    for branch in effective_branches(branches, config) {
        missing.extend(tagger.new_tags(&branch)?);
    }

    for tag in &missing {
        println!("{}", tag);
    }

    // Exit status signals whether there is pending work
    if missing.is_empty() {
        std::process::exit(1);
    }
    Ok(())
}

fn hash_command(cli: &Cli, config: &Config, tag: &str, branch: Option<&str>) -> Result<()> {
    let (docs, upstream) = open_repos(cli, config)?;
    let tagger = make_tagger(cli, config, &docs, &upstream);
    if !cli.no_fetch {
        tagger.fetch_all()?;
    }

    let plan = tagger.resolve(branch, tag, None)?;
    println!("{}", plan.target);
    Ok(())
}

fn tag_command(cli: &Cli, config: &Config, branches: &[String], push: bool) -> Result<()> {
    let (docs, upstream) = open_repos(cli, config)?;
    let tagger = make_tagger(cli, config, &docs, &upstream);
    if !cli.no_fetch {
        tagger.fetch_all()?;
    }

    let plans = tagger.sync(&effective_branches(branches, config), push)?;
    if plans.is_empty() {
        ui::status(cli.quiet, "All release tags are already mirrored");
    }
    Ok(())
}

fn mantag_command(
    cli: &Cli,
    config: &Config,
    tag: &str,
    target: &str,
    branch: Option<&str>,
    push: bool,
) -> Result<()> {
    let (docs, upstream) = open_repos(cli, config)?;
    let tagger = make_tagger(cli, config, &docs, &upstream);
    if !cli.no_fetch {
        tagger.fetch_all()?;
    }

    let plan = tagger.resolve(branch, tag, Some(target))?;
    tagger.create_tag(&plan, push)?;
    Ok(())
}

fn clone_command(
    cli: &Cli,
    config: &Config,
    branch: Option<&str>,
    no_branch: bool,
    repo: Option<&str>,
    check: bool,
) -> Result<()> {
    let repo_url = repo
        .map(|s| s.to_string())
        .unwrap_or_else(|| config.cloner.repo.clone());

    let branch = if no_branch {
        None
    } else if let Some(branch) = branch {
        Some(branch.to_string())
    } else {
        Some(cloner::default_branch(
            &cli.docs.join(&config.cloner.branch_file),
        )?)
    };

    cloner::clone_upstream(
        &config.cloner,
        &repo_url,
        branch.as_deref(),
        check,
        &cli.docs,
        cli.quiet,
    )?;
    Ok(())
}

fn label_command(
    cli: &Cli,
    config: &Config,
    number: u64,
    opts: &LabelOpts,
    is_pr: bool,
) -> Result<()> {
    let owner = require_setting(opts.owner.as_deref(), &config.labeler.owner, "owner")?;
    let repo = require_setting(opts.repo.as_deref(), &config.labeler.repo, "repo")?;

    let (dry_run, authed) = if opts.authed_dry_run {
        (true, true)
    } else {
        (opts.dry_run, !opts.dry_run)
    };

    let token = if authed {
        Some(std::env::var("GITHUB_TOKEN").map_err(|_| {
            anyhow::anyhow!("GITHUB_TOKEN is not set; use --dry-run to run unauthenticated")
        })?)
    } else {
        None
    };

    let api = HttpGithub::new(config.labeler.api_url.as_str(), owner, repo, token)?;
    let options = ProcessOptions {
        dry_run,
        force_process_closed: opts.force_process_closed,
        use_author_association: opts.use_author_association,
    };

    if is_pr {
        let codeowners_path = cli.docs.join(&config.labeler.codeowners_path);
        let owners_text = match fs::read_to_string(&codeowners_path) {
            Ok(text) => text,
            Err(_) => {
                ui::display_warning(&format!(
                    "Cannot read '{}'; no codeowner labels will be applied",
                    codeowners_path.display()
                ));
                String::new()
            }
        };
        let owners = CodeOwners::parse(&owners_text);
        labeler::process_pr(&api, &config.labeler, &owners, number, &options)?;
    } else {
        labeler::process_issue(&api, &config.labeler, number, &options)?;
    }
    Ok(())
}

fn require_setting(flag: Option<&str>, configured: &str, name: &str) -> Result<String> {
    flag.map(|s| s.to_string())
        .filter(|s| !s.is_empty())
        .or_else(|| {
            if configured.is_empty() {
                None
            } else {
                Some(configured.to_string())
            }
        })
        .ok_or_else(|| {
            anyhow::anyhow!(
                "Repository {} not configured; pass --{} or set labeler.{}",
                name,
                name,
                name
            )
        })
}
