use web_sys::{window, Storage};

pub fn get_local_storage() -> Option<Storage> {
    window()?.local_storage().ok()?
}

pub fn read_raw(key: &str) -> Result<Option<String>, String> {
    let storage = get_local_storage().ok_or("Нет доступа к localStorage")?;
    storage
        .get_item(key)
        .map_err(|_| "Ошибка чтения из localStorage".to_string())
}

pub fn write_raw(key: &str, value: &str) -> Result<(), String> {
    let storage = get_local_storage().ok_or("Нет доступа к localStorage")?;
    storage
        .set_item(key, value)
        .map_err(|_| "Ошибка записи в localStorage".to_string())
}
