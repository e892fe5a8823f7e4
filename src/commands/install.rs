//! Implementation of the `superbeads install` command.

use crate::cli::InstallArgs;
use crate::error::Result;
use crate::install::{InstallOptions, Installer, PathLineOutcome};
use colored::Colorize;

pub fn cmd_install(args: InstallArgs) -> Result<()> {
    let opts = InstallOptions {
        prefix: args.prefix,
        no_path: args.no_path,
        rc_file: args.rc_file,
    };
    let installer = Installer::from_options(&opts)?;
    let report = installer.run()?;

    for name in &report.missing_prerequisites {
        println!(
            "{} '{}' not found on PATH; superbeads works without it but agents may need it",
            "warning:".yellow(),
            name
        );
    }

    println!("{} {}", "Installed".green(), report.binary.display());
    println!(
        "  {} templates in {}",
        report.templates_written,
        report.templates_dir.display()
    );

    match &report.path_line {
        PathLineOutcome::Added(rc) => {
            println!("  Added {} to PATH in {}", installer.bin_dir().display(), rc.display());
            println!();
            println!("Restart your shell or run `source {}`.", rc.display());
        }
        PathLineOutcome::AlreadyPresent(rc) => {
            println!("  PATH already configured in {}", rc.display());
        }
        PathLineOutcome::Disabled => {
            println!(
                "  Skipped PATH setup; add {} to PATH yourself.",
                installer.bin_dir().display()
            );
        }
    }
    Ok(())
}
