use anyhow::{Context, Result};
use clap::Parser;
use launchspec::{assemble, LaunchFlags, NamespaceFlags, PrivilegeFlags};
use log::{debug, info};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "launchspec")]
#[command(about = "Resolve container launch flags into a validated launch specification")]
struct Args {
    /// JSON file with launch flags; command-line flags are layered on top
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(short, long)]
    verbose: bool,

    /// Bind path spec src[:dest[:opts]], opts being ro or rw (default)
    #[arg(short = 'B', long = "bind", value_name = "SPEC", value_delimiter = ',')]
    binds: Vec<String>,

    /// Home directory spec src[:dest]
    #[arg(short = 'H', long, value_name = "SPEC")]
    home: Option<String>,

    /// Persistent overlay image
    #[arg(short, long, value_name = "PATH")]
    overlay: Option<String>,

    /// Scratch directory backed by a temporary dir (use -W to force location)
    #[arg(short = 'S', long, value_name = "PATH")]
    scratch: Option<String>,

    /// Working directory for /tmp, /var/tmp and $HOME (with --contain)
    #[arg(short = 'W', long, value_name = "PATH")]
    workdir: Option<String>,

    /// Program to use for the interactive shell
    #[arg(short, long, value_name = "PATH")]
    shell: Option<String>,

    /// Initial working directory inside the container
    #[arg(long, value_name = "PATH")]
    pwd: Option<String>,

    #[arg(long, value_name = "NAME")]
    hostname: Option<String>,

    /// Execute /sbin/init to boot the container (root only)
    #[arg(long)]
    boot: bool,

    /// Run in a new user namespace as uid 0
    #[arg(short, long)]
    fakeroot: bool,

    /// Clean environment before running the container
    #[arg(short = 'e', long = "cleanenv")]
    clean_env: bool,

    /// Use minimal /dev and empty /tmp and $HOME instead of host filesystems
    #[arg(short, long)]
    contain: bool,

    /// Contain file systems, PID, IPC and environment
    #[arg(short = 'C', long = "containall")]
    contain_all: bool,

    /// Enable Nvidia support
    #[arg(long = "nv")]
    nvidia: bool,

    #[arg(short, long)]
    pid: bool,

    #[arg(short, long)]
    ipc: bool,

    /// New network namespace (loopback only)
    #[arg(short, long)]
    net: bool,

    #[arg(long)]
    uts: bool,

    #[arg(short = 'u', long = "userns")]
    userns: bool,

    /// Let root keep its privileges in the container
    #[arg(long)]
    keep_privs: bool,

    /// Drop all privileges from root in the container (default)
    #[arg(
        long,
        value_name = "BOOL",
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true"
    )]
    no_privs: Option<bool>,

    /// Capabilities to add, comma separated
    #[arg(long, value_name = "CAPS", value_delimiter = ',')]
    add_caps: Vec<String>,

    /// Capabilities to drop, comma separated
    #[arg(long, value_name = "CAPS", value_delimiter = ',')]
    drop_caps: Vec<String>,

    /// Allow setuid binaries in the container (root only)
    #[arg(long = "allow-setuid")]
    allow_setuid: bool,
}

impl Args {
    fn into_flags(self) -> LaunchFlags {
        LaunchFlags {
            binds: self.binds,
            home: self.home,
            overlay: self.overlay,
            scratch: self.scratch,
            workdir: self.workdir,
            pwd: self.pwd,
            shell: self.shell,
            hostname: self.hostname,
            boot: self.boot,
            clean_env: self.clean_env,
            contain: self.contain,
            contain_all: self.contain_all,
            nvidia: self.nvidia,
            namespaces: NamespaceFlags {
                pid: self.pid,
                ipc: self.ipc,
                net: self.net,
                uts: self.uts,
                user: self.userns,
            },
            privileges: PrivilegeFlags {
                fakeroot: self.fakeroot,
                keep_privs: self.keep_privs,
                no_privs: self.no_privs,
                allow_setuid: self.allow_setuid,
            },
            add_caps: self.add_caps,
            drop_caps: self.drop_caps,
        }
    }
}

/// Layer command-line flags over `base` and fill in the home directory.
///
/// `home_env` is the invoking user's `$HOME`; it is only used when neither
/// the config file nor the command line names a home.
fn launch_flags(base: LaunchFlags, cli: LaunchFlags, home_env: Option<String>) -> LaunchFlags {
    let mut flags = base.merged_with(cli);
    if flags.home.as_deref().is_none_or(str::is_empty) {
        flags.home = home_env;
    }
    flags
}

fn main() -> Result<()> {
    let args = Args::parse();

    if args.verbose {
        env_logger::init();
    }

    let base = match &args.config {
        Some(path) => {
            info!("loading launch flags from {}", path.display());
            LaunchFlags::from_file(path)?
        }
        None => LaunchFlags::default(),
    };
    let flags = launch_flags(base, args.into_flags(), std::env::var("HOME").ok());
    debug!("resolving {:?}", flags);

    let spec = assemble(&flags).context("invalid launch configuration")?;

    info!(
        "privileges: {:?}, containment: {:?}, namespaces: {:?}",
        spec.privileges().mode(),
        spec.containment(),
        spec.namespaces().enabled()
    );
    #[cfg(target_os = "linux")]
    {
        info!("clone flags: {:?}", launchspec::engine::clone_flags(spec.namespaces()));
        for (bind, mount_flags) in launchspec::engine::mount_plan(&spec) {
            debug!("bind {} with {:?}", bind, mount_flags);
        }
    }

    println!("{}", serde_json::to_string_pretty(&spec)?);

    Ok(())
}
