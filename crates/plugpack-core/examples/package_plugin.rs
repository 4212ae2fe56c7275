//! Example: Packaging a plugin with plugpack-core
//!
//! Run with: `cargo run --example package_plugin`

use plugpack_core::NoopProgress;
use plugpack_core::PackageConfig;
use plugpack_core::Packager;
use plugpack_core::audit_archive;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let workdir = tempfile::tempdir()?;
    let plugin = workdir.path().join("hello-dolly");

    // A minimal plugin, plus a file that should never ship
    std::fs::create_dir_all(plugin.join("vendor"))?;
    std::fs::write(
        plugin.join("hello.php"),
        "<?php\n/*\n * Plugin Name: Hello Dolly\n */\n",
    )?;
    std::fs::write(plugin.join("vendor/autoload.php"), "<?php")?;
    std::fs::write(plugin.join("NOTES.md"), "internal notes")?;

    let config = PackageConfig::default()
        .with_source_root(workdir.path())
        .with_output_dir(workdir.path())
        .with_plugin_folder("hello-dolly")
        .with_main_file("hello.php")
        .with_plugin_name("Hello Dolly");
    let packager = Packager::new(config.clone());

    let report = packager.run(&mut NoopProgress)?;
    println!("Created {}", report.archive_name());
    println!("  Files: {}", report.archive_entries);
    println!("  Size:  {:.2} MB", report.archive_size_mb());

    let audit = audit_archive(
        &report.archive_path,
        &config.plugin_source_dir(),
        &config.plugin_folder,
        packager.rules(),
    )?;
    println!("  Audit: {} entries, clean = {}", audit.entries_checked, audit.is_clean());

    Ok(())
}
