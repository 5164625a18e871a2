//! Colored terminal output helpers.
//!
//! All user-facing output goes through these functions so we get
//! consistent styling across every command.

use comfy_table::{ContentArrangement, Table};
use console::style;

use crate::vault::{Credential, CredentialSummary, Reveal};

/// Print a green success message: "check_mark {msg}"
pub fn success(msg: &str) {
    println!("{} {}", style("\u{2713}").green().bold(), msg);
}

/// Print a red error message: "x_mark {msg}"
pub fn error(msg: &str) {
    eprintln!("{} {}", style("\u{2717}").red().bold(), msg);
}

/// Print a yellow warning: "warning_sign {msg}"
pub fn warning(msg: &str) {
    eprintln!("{} {}", style("\u{26a0}").yellow().bold(), msg);
}

/// Print a blue info message: "info_sign {msg}"
pub fn info(msg: &str) {
    println!("{} {}", style("\u{2139}").blue().bold(), msg);
}

/// Print a dim tip/hint: "arrow {msg}"
pub fn tip(msg: &str) {
    println!("{} {}", style("\u{2192}").dim(), style(msg).dim());
}

/// Print a resolved credential and where its password went.
pub fn print_credential(site: &str, credential: &Credential, reveal: &Reveal) {
    success(&format!(
        "Credential found for '{site}': {}",
        credential.display_name()
    ));
    println!("   Username: {}", credential.username);
    match reveal {
        Reveal::Copied => println!("   Password: copied to clipboard"),
        Reveal::Shown(password) => println!("   Password: {password}"),
    }
}

/// Print every site with its accounts (Site, #, Username, Account).
pub fn print_credentials_table(sites: &[(String, Vec<CredentialSummary>)]) {
    if sites.is_empty() {
        info("No credentials stored yet.");
        tip("Run `cerbero add <site> <user> <password> [label]` to add one.");
        return;
    }

    let total: usize = sites.iter().map(|(_, creds)| creds.len()).sum();
    info(&format!(
        "Stored credentials ({total} account(s) across {} site(s))",
        sites.len()
    ));

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Site", "#", "Username", "Account"]);

    for (site, creds) in sites {
        for (i, cred) in creds.iter().enumerate() {
            table.add_row(vec![
                if i == 0 { site.clone() } else { String::new() },
                (i + 1).to_string(),
                cred.username.clone(),
                cred.account_label.clone().unwrap_or_default(),
            ]);
        }
    }

    println!("{table}");
}
