use tictactoe_engine::config::{
    ConfigError, ConfigManager, FileContentConfigProvider, GameConfig, YamlConfigSerializer,
};

const CONFIG_FILE_NAME: &str = "tictactoe_config.yaml";

fn get_config_path() -> String {
    if let Ok(exe_path) = std::env::current_exe()
        && let Some(exe_dir) = exe_path.parent()
    {
        return exe_dir.join(CONFIG_FILE_NAME).to_string_lossy().into_owned();
    }
    CONFIG_FILE_NAME.to_string()
}

pub fn load_config(path: Option<&str>) -> Result<GameConfig, ConfigError> {
    let manager: ConfigManager<FileContentConfigProvider, GameConfig, YamlConfigSerializer> =
        match path {
            Some(path) => ConfigManager::from_yaml_file(path),
            None => ConfigManager::from_yaml_file(get_config_path()),
        };
    manager.get_config()
}
