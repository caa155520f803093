use anyhow::anyhow;
use chara::{
    customize::{Clan, CustomizationSet, CustomizeIndex, CustomizeRegistry, Gender},
    excel::Locale,
    pack::Repository,
    sheets::GameData,
};
use clap::{Parser, Subcommand};
use std::{fs, path::Path};

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Path to "sqpack" directory
    #[arg(short, long, value_name = "SQPACK_DIR")]
    repo_dir: Box<Path>,

    /// Directory path to write exported files into
    #[arg(short, long)]
    out_dir: Option<Box<Path>>,

    /// Sheet language (ja, en, de, fr)
    #[arg(short, long, default_value = "en")]
    locale: Box<str>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List things within the customization catalog
    #[command(subcommand)]
    List(ListCommands),

    /// Export things from the customization catalog
    #[command(subcommand)]
    Export(ExportCommands),
}

#[derive(Subcommand)]
enum ListCommands {
    /// List every clan/gender customization set
    Sets,

    /// List the available options of one set
    Options {
        /// Clan name (e.g. "Midlander", "Seeker of the Sun")
        #[arg(short, long)]
        clan: Clan,
        /// "male" or "female"
        #[arg(short, long)]
        gender: Gender,
    },
}

#[derive(Subcommand)]
enum ExportCommands {
    /// Export one set's full option catalog → .csv
    Set {
        #[arg(short, long)]
        clan: Clan,
        #[arg(short, long)]
        gender: Gender,
    },
    /// Export one set's color lists → .csv
    Colors {
        #[arg(short, long)]
        clan: Clan,
        #[arg(short, long)]
        gender: Gender,
    },
}

fn parse_locale(s: &str) -> anyhow::Result<Locale> {
    match s {
        "ja" => Ok(Locale::Japanese),
        "en" => Ok(Locale::English),
        "de" => Ok(Locale::German),
        "fr" => Ok(Locale::French),
        _ => Err(anyhow!("unsupported locale \"{s}\"")),
    }
}

fn list_sets(registry: &CustomizeRegistry) {
    for set in registry.sets() {
        let available = CustomizeIndex::ALL
            .iter()
            .filter(|i| set.is_available(**i))
            .count();
        println!(
            "{:<24} {:<8} {} options",
            registry.names().clan_name(set.clan(), set.gender()),
            set.gender(),
            available,
        );
    }
}

fn list_options(set: &CustomizationSet) {
    for index in CustomizeIndex::ALL {
        if !set.is_available(index) {
            continue;
        }
        println!(
            "{:<24} {:<20?} {} choices",
            set.option_name(index),
            set.menu_type(index),
            set.count(index),
        );
    }
}

fn file_stem(set: &CustomizationSet, suffix: &str) -> String {
    format!("{:?}_{}_{suffix}", set.clan(), set.gender()).to_lowercase()
}

fn export_set(set: &CustomizationSet, out_dir: &Path) -> anyhow::Result<()> {
    let out_path = out_dir.join(file_stem(set, "options")).with_extension("csv");
    fs::create_dir_all(out_dir)?;
    let mut w = csv::Writer::from_path(&out_path)?;

    w.write_record(["option", "choice", "value", "icon", "display_index"])?;
    for index in CustomizeIndex::ALL {
        for i in 0..set.count(index) {
            let data = set.data(index, i);
            w.write_record([
                set.option_name(index),
                &i.to_string(),
                &data.value.to_string(),
                &data.icon.to_string(),
                &data.display_index.to_string(),
            ])?;
        }
    }
    w.flush()?;

    println!("{}", out_path.to_string_lossy());
    Ok(())
}

fn export_colors(set: &CustomizationSet, out_dir: &Path) -> anyhow::Result<()> {
    let lists: [(&str, &[chara::customize::CustomizeData]); 9] = [
        ("skin", set.skin_colors()),
        ("hair", set.hair_colors()),
        ("highlights", set.highlight_colors()),
        ("eye", set.eye_colors()),
        ("tattoo", set.tattoo_colors()),
        ("lip_dark", set.lip_colors_dark()),
        ("lip_light", set.lip_colors_light()),
        ("face_paint_dark", set.face_paint_colors_dark()),
        ("face_paint_light", set.face_paint_colors_light()),
    ];

    let out_path = out_dir.join(file_stem(set, "colors")).with_extension("csv");
    fs::create_dir_all(out_dir)?;
    let mut w = csv::Writer::from_path(&out_path)?;

    w.write_record(["list", "choice", "value", "rgba", "table_entry"])?;
    for (name, list) in lists {
        for (i, data) in list.iter().enumerate() {
            w.write_record([
                name,
                &i.to_string(),
                &data.value.to_string(),
                &format!("{:08X}", data.icon),
                &data.display_index.to_string(),
            ])?;
        }
    }
    w.flush()?;

    println!("{}", out_path.to_string_lossy());
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let repo = Repository::open(cli.repo_dir)?;
    let data = GameData::load(&repo, parse_locale(&cli.locale)?)?;
    let registry = CustomizeRegistry::new(&data)?;

    match cli.command {
        Commands::List(sub) => match sub {
            ListCommands::Sets => {
                list_sets(&registry);
                Ok(())
            }
            ListCommands::Options { clan, gender } => {
                list_options(registry.get(clan, gender));
                Ok(())
            }
        },
        Commands::Export(sub) => {
            let out_dir = cli
                .out_dir
                .ok_or(anyhow!("--out-dir is required for export commands"))?;

            match sub {
                ExportCommands::Set { clan, gender } => {
                    export_set(registry.get(clan, gender), &out_dir)
                }
                ExportCommands::Colors { clan, gender } => {
                    export_colors(registry.get(clan, gender), &out_dir)
                }
            }
        }
    }
}
