use bevy::prelude::*;
use serde::Deserialize;
use std::{fs, path::Path, time::Duration};

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct SessionConfig {
    /// Seconds of active play per round.
    pub game_duration: i32,
    pub countdown_start: i32,
    pub tick_period_secs: f32,
    pub target_capacity: usize,
    /// A burst is requested whenever `time_left` is a multiple of this.
    pub spawn_interval: i32,
    /// No bursts once `time_left` drops to this value or below.
    pub spawn_min_time_left: i32,
}
impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            game_duration: 35,
            countdown_start: 3,
            tick_period_secs: 1.0,
            target_capacity: 30,
            spawn_interval: 5,
            spawn_min_time_left: 4,
        }
    }
}
impl SessionConfig {
    pub fn tick_period(&self) -> Duration {
        Duration::from_secs_f32(self.tick_period_secs.max(0.001))
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct SpawnConfig {
    pub burst_size: u32,
    pub pacing_ms: u64,
}
impl Default for SpawnConfig {
    fn default() -> Self {
        Self {
            burst_size: 3,
            pacing_ms: 300,
        }
    }
}
impl SpawnConfig {
    pub fn pacing(&self) -> Duration {
        Duration::from_millis(self.pacing_ms)
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct AudioConfig {
    pub muted: bool,
    pub hit_sound_variants: u32,
}
impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            muted: false,
            hit_sound_variants: 4,
        }
    }
}

#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    /// Seconds to linger on the score screen before the next round or exit. 0 => next frame.
    #[serde(rename = "autoClose")]
    pub auto_close: f32,
    pub rng_seed: Option<u64>,
}

#[derive(Debug, Deserialize, Resource, Clone, Default, PartialEq)]
#[serde(default)]
pub struct GameConfig {
    pub session: SessionConfig,
    pub spawn: SpawnConfig,
    pub audio: AudioConfig,
    pub app: AppConfig,
}

impl GameConfig {
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, String> {
        let data = fs::read_to_string(&path).map_err(|e| format!("read config: {e}"))?;
        ron::from_str(&data).map_err(|e| format!("parse RON: {e}"))
    }

    pub fn load_or_default(path: impl AsRef<Path>) -> (Self, Option<String>) {
        match Self::load_from_file(&path) {
            Ok(cfg) => (cfg, None),
            Err(e) => (Self::default(), Some(e)),
        }
    }

    /// Merge several RON files (later files override earlier ones key by key).
    /// Returns the config, the paths actually used and any read/parse errors.
    pub fn load_layered<P, I>(paths: I) -> (Self, Vec<String>, Vec<String>)
    where
        P: AsRef<Path>,
        I: IntoIterator<Item = P>,
    {
        use ron::value::Value;
        let mut merged: Option<Value> = None;
        let mut used = Vec::new();
        let mut errors = Vec::new();
        fn merge_value(base: &mut Value, overlay: Value) {
            match (base, overlay) {
                (Value::Map(bm), Value::Map(om)) => {
                    for (k, v) in om.into_iter() {
                        let mut pending = Some(v);
                        for (ek, ev) in bm.iter_mut() {
                            if *ek == k {
                                if let Some(val) = pending.take() {
                                    merge_value(ev, val);
                                }
                                break;
                            }
                        }
                        if let Some(val) = pending {
                            bm.insert(k, val);
                        }
                    }
                }
                (b, o) => *b = o,
            }
        }
        for p in paths {
            let path_ref = p.as_ref();
            match fs::read_to_string(path_ref) {
                Ok(txt) => match ron::from_str::<Value>(&txt) {
                    Ok(val) => {
                        match &mut merged {
                            Some(cur) => merge_value(cur, val),
                            None => merged = Some(val),
                        }
                        used.push(path_ref.display().to_string());
                    }
                    Err(e) => errors.push(format!("{}: parse error: {e}", path_ref.display())),
                },
                Err(e) => errors.push(format!("{}: read error: {e}", path_ref.display())),
            }
        }
        let Some(val) = merged else {
            return (GameConfig::default(), used, errors);
        };
        match val.into_rust::<GameConfig>() {
            Ok(cfg) => (cfg, used, errors),
            Err(e) => {
                errors.push(format!(
                    "failed to deserialize merged config; using defaults: {e}"
                ));
                (GameConfig::default(), used, errors)
            }
        }
    }

    pub fn validate(&self) -> Vec<String> {
        let mut w = Vec::new();
        let s = &self.session;
        if s.game_duration <= 0 {
            w.push(format!(
                "session.game_duration {} not positive -> rounds end on the first tick",
                s.game_duration
            ));
        }
        if s.countdown_start < 0 {
            w.push(format!(
                "session.countdown_start {} negative -> play starts as soon as input is chosen",
                s.countdown_start
            ));
        }
        if s.tick_period_secs <= 0.0 {
            w.push("session.tick_period_secs must be > 0".into());
        } else if s.tick_period_secs > 5.0 {
            w.push(format!(
                "session.tick_period_secs {} very long; rounds will drag",
                s.tick_period_secs
            ));
        }
        if s.target_capacity == 0 {
            w.push("session.target_capacity is 0; no cloud can be tracked".into());
        }
        if s.spawn_interval <= 0 {
            w.push(format!(
                "session.spawn_interval {} must be > 0",
                s.spawn_interval
            ));
        }
        if s.spawn_min_time_left >= s.game_duration {
            w.push(format!(
                "session.spawn_min_time_left {} >= game_duration {}; nothing will spawn",
                s.spawn_min_time_left, s.game_duration
            ));
        }
        if self.spawn.burst_size == 0 {
            w.push("spawn.burst_size is 0; bursts are empty".into());
        }
        let burst_span = self.spawn.pacing_ms as f32 * self.spawn.burst_size as f32 / 1000.0;
        if s.spawn_interval > 0 && burst_span >= s.spawn_interval as f32 * s.tick_period_secs {
            w.push(format!(
                "spawn burst lasts {burst_span:.2}s, longer than the spawn interval; bursts will be rejected"
            ));
        }
        if self.audio.hit_sound_variants == 0 {
            w.push("audio.hit_sound_variants is 0; hit sounds disabled".into());
        }
        if self.app.auto_close < 0.0 {
            w.push(format!(
                "app.autoClose {} negative -> treated as disabled (should be >= 0)",
                self.app.auto_close
            ));
        }
        w
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_sample_constants() {
        let cfg = GameConfig::default();
        assert_eq!(cfg.session.game_duration, 35);
        assert_eq!(cfg.session.countdown_start, 3);
        assert_eq!(cfg.session.target_capacity, 30);
        assert_eq!(cfg.spawn.burst_size, 3);
        assert_eq!(cfg.spawn.pacing(), Duration::from_millis(300));
        assert!(cfg.validate().is_empty(), "{:?}", cfg.validate());
    }

    #[test]
    fn validate_flags_bad_values() {
        let mut cfg = GameConfig::default();
        cfg.session.game_duration = 0;
        cfg.session.countdown_start = -2;
        cfg.spawn.burst_size = 0;
        let warns = cfg.validate().join("\n");
        assert!(warns.contains("game_duration 0 not positive"));
        assert!(warns.contains("play starts as soon as input is chosen"));
        assert!(warns.contains("burst_size"));
    }

    #[test]
    fn partial_ron_keeps_defaults() {
        let cfg: GameConfig = ron::from_str("(session: (game_duration: 10))").unwrap();
        assert_eq!(cfg.session.game_duration, 10);
        assert_eq!(cfg.session.countdown_start, 3);
        assert_eq!(cfg.spawn, SpawnConfig::default());
    }
}
