//! filtros.rs
//!
//! Filtro por categoría de las alertas y su persistencia local.
//!
//! - `visible_alerts` es puro: dado lo último descargado y las preferencias,
//!   devuelve el subconjunto a pintar (sin tocar la vista)
//! - Las preferencias se guardan bajo una sola clave (`alertFilterPreferences`)
//!   como objeto JSON categoría → bool. Nunca se envían al servidor
//! - Una categoría conocida sin preferencia guardada se muestra; una
//!   categoría sin casilla no se muestra nunca

use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;
use std::sync::Mutex;
use tracing::warn;

use super::categorias::{is_known, CATEGORIAS};
use super::error::StorageError;
use crate::models::types::Alerta;

pub const PREFS_KEY: &str = "alertFilterPreferences";

/// Almacenamiento clave/valor del cliente (equivalente a `localStorage`).
pub trait PreferenceStorage: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

#[derive(Debug, Default)]
pub struct MemoryStorage {
    items: Mutex<HashMap<String, String>>,
}

impl PreferenceStorage for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.items.lock().unwrap_or_else(|e| e.into_inner()).get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        // un pánico ajeno con el candado tomado no deja el mapa a medias
        self.items.lock().unwrap_or_else(|e| e.into_inner()).insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Almacén en un fichero JSON `{clave: valor}`; sobrevive entre sesiones del visor.
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self { Self { path: path.into() } }

    fn read_all(&self) -> Result<BTreeMap<String, String>, StorageError> {
        match std::fs::read_to_string(&self.path) {
            Ok(txt) if txt.trim().is_empty() => Ok(BTreeMap::new()),
            Ok(txt) => Ok(serde_json::from_str(&txt)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(source) => Err(StorageError::Io { path: self.path.display().to_string(), source }),
        }
    }
}

impl PreferenceStorage for FileStorage {
    fn get(&self, key: &str) -> Option<String> {
        match self.read_all() {
            Ok(mut all) => all.remove(key),
            Err(e) => {
                warn!("preferencias: {e}");
                None
            }
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut all = self.read_all().unwrap_or_default();
        all.insert(key.to_string(), value.to_string());
        let txt = serde_json::to_string_pretty(&all)?;
        std::fs::write(&self.path, txt)
            .map_err(|source| StorageError::Io { path: self.path.display().to_string(), source })
    }
}

/// Estado de las casillas de filtro.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FilterPreferences {
    shown: BTreeMap<String, bool>,
}

impl FilterPreferences {
    pub fn is_shown(&self, tipo: &str) -> bool {
        self.shown.get(tipo).copied().unwrap_or(true)
    }

    /// Se pinta solo si la categoría tiene casilla y está marcada.
    pub fn is_visible(&self, tipo: &str) -> bool { is_known(tipo) && self.is_shown(tipo) }

    pub fn set(&mut self, tipo: &str, shown: bool) {
        self.shown.insert(tipo.to_string(), shown);
    }

    /// Categorías conocidas con la casilla marcada.
    pub fn checked(&self) -> Vec<&'static str> {
        CATEGORIAS.iter().map(|c| c.tipo).filter(|t| self.is_shown(t)).collect()
    }

    /// Mapa completo a persistir: todas las casillas más cualquier categoría extra.
    fn snapshot(&self) -> BTreeMap<String, bool> {
        let mut out: BTreeMap<String, bool> =
            CATEGORIAS.iter().map(|c| (c.tipo.to_string(), self.is_shown(c.tipo))).collect();
        for (k, v) in &self.shown {
            out.insert(k.clone(), *v);
        }
        out
    }

    pub fn save(&self, storage: &dyn PreferenceStorage) -> Result<(), StorageError> {
        let txt = serde_json::to_string(&self.snapshot())?;
        storage.set(PREFS_KEY, &txt)
    }

    /// Restaura lo guardado; lo ausente o ilegible queda en su valor por defecto.
    pub fn load(storage: &dyn PreferenceStorage) -> Self {
        let mut prefs = Self::default();
        let Some(txt) = storage.get(PREFS_KEY) else { return prefs };
        match serde_json::from_str::<BTreeMap<String, serde_json::Value>>(&txt) {
            Ok(saved) => {
                for (tipo, v) in saved {
                    if let Some(b) = v.as_bool() {
                        prefs.set(&tipo, b);
                    }
                }
            }
            Err(e) => warn!("preferencias de filtro ilegibles, se ignoran: {e}"),
        }
        prefs
    }
}

/// Subconjunto de `all` cuya categoría está entre las casillas marcadas, en el mismo orden.
pub fn visible_alerts<'a>(all: &'a [Alerta], prefs: &FilterPreferences) -> Vec<&'a Alerta> {
    all.iter().filter(|a| prefs.is_visible(&a.tipo)).collect()
}
