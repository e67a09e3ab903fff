use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Result};
use dotboy_common::app::App;
use dotboy_gb::{BatteryStore, GameBoy, GameBoyApp, GameBoyOptions};
use dotboy_sdl2::{SdlContext, SdlInitInfo};

/// Battery saves as `<dir>/<save id>.sav`.
pub struct FileBatteryStore {
    dir: PathBuf,
}

impl FileBatteryStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, save_id: &str) -> PathBuf {
        self.dir.join(format!("{save_id}.sav"))
    }
}

impl BatteryStore for FileBatteryStore {
    fn load(&mut self, save_id: &str) -> io::Result<Option<Vec<u8>>> {
        match fs::read(self.path_for(save_id)) {
            Ok(data) => Ok(Some(data)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err),
        }
    }

    fn save(&mut self, save_id: &str, data: &[u8]) -> io::Result<()> {
        fs::create_dir_all(&self.dir)?;
        fs::write(self.path_for(save_id), data)
    }
}

/// Everything the command line can set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub rom_path: PathBuf,
    pub boot_rom_path: Option<PathBuf>,
    pub saves_dir: PathBuf,
    pub scale: Option<u32>,
}

/// Save identifier for a ROM file: its stem, or "game" if it has none.
pub fn save_id_for(rom_path: &Path) -> String {
    rom_path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "game".to_string())
}

pub const USAGE: &str = "Usage: dotboy <rom> [--boot <boot.bin>] [--saves <dir>] [--scale N]";

/// Parse the arguments after the program name.
pub fn parse_args(args: impl IntoIterator<Item = String>) -> Result<Config> {
    let mut rom_path = None;
    let mut boot_rom_path = None;
    let mut saves_dir = PathBuf::from("saves");
    let mut scale = None;

    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--boot" => boot_rom_path = Some(PathBuf::from(value_for(&arg, args.next())?)),
            "--saves" => saves_dir = PathBuf::from(value_for(&arg, args.next())?),
            "--scale" => {
                let value = value_for(&arg, args.next())?;
                let parsed = value
                    .parse::<u32>()
                    .map_err(|_| anyhow!("--scale expects a positive integer, got '{value}'"))?;
                scale = Some(parsed);
            }
            flag if flag.starts_with("--") => bail!("unknown option '{flag}'\n{USAGE}"),
            _ if rom_path.is_none() => rom_path = Some(PathBuf::from(arg)),
            _ => bail!("unexpected argument '{arg}'\n{USAGE}"),
        }
    }

    let Some(rom_path) = rom_path else {
        bail!("no ROM path provided\n{USAGE}");
    };
    Ok(Config {
        rom_path,
        boot_rom_path,
        saves_dir,
        scale,
    })
}

fn value_for(flag: &str, value: Option<String>) -> Result<String> {
    value.ok_or_else(|| anyhow!("{flag} expects a value\n{USAGE}"))
}

pub fn run(config: Config) -> Result<()> {
    log::info!("Playing ROM path: '{}'", config.rom_path.display());
    let rom = fs::read(&config.rom_path)?;
    let boot_rom = config.boot_rom_path.as_ref().map(fs::read).transpose()?;

    let options = GameBoyOptions::builder()
        .rom(rom)
        .save_id(save_id_for(&config.rom_path))
        .build();
    let options = GameBoyOptions { boot_rom, ..options };
    let gb = GameBoy::new(options)?;

    let battery = FileBatteryStore::new(&config.saves_dir);
    let mut app = GameBoyApp::new(gb, Box::new(battery))?;
    if let Some(scale) = config.scale {
        app = app.with_scale(scale);
    }

    let init_info = SdlInitInfo::builder()
        .width(app.width())
        .height(app.height())
        .scale(app.scale())
        .title(app.title())
        .build();
    SdlContext::run(init_info, app)
}
