//! Config serialization to TOML
//!
//! Single source of truth for config file format.

use super::Config;

impl Config {
    /// Serialize [[learnings]] entries, or a commented example when empty
    pub(super) fn learnings_to_toml(&self) -> String {
        if self.learnings.is_empty() {
            return r#"
# Learnings passed to the planner (first 3 are used each cycle)
# [[learnings]]
# category = "Visual"
# insight = "Golden hour shots outperform midday ones"
# impact = "positive"              # positive, negative
"#
            .to_string();
        }

        let mut output = String::from("\n");
        for seed in &self.learnings {
            output.push_str("[[learnings]]\n");
            output.push_str(&format!("category = {:?}\n", seed.category));
            output.push_str(&format!("insight = {:?}\n", seed.insight));
            output.push_str(&format!("impact = {:?}\n", seed.impact));
            output.push('\n');
        }
        output
    }

    fn api_key_to_toml(&self) -> String {
        match &self.backend.api_key {
            Some(key) => format!("api_key = {:?}", key),
            None => "# api_key = \"...\"             # prefer the env var below".to_string(),
        }
    }

    /// Render the full config file
    pub fn to_toml(&self) -> String {
        format!(
            r#"# contentloop configuration

# Dashboard palette: dark, light, neon
theme = "{theme}"

# Start the loop as soon as the app launches
autostart = {autostart}

# Generative backend
[backend]
provider = "{provider}"             # gemini, demo
api_base = "{api_base}"
{api_key}
key_env = "{key_env}"
trend_model = "{trend_model}"
planner_model = "{planner_model}"
image_model = "{image_model}"
timeout_secs = {timeout_secs}
thinking_budget = {thinking_budget}
image_size = "{image_size}"

# Loop pacing
[timing]
settle_delay_ms = {settle}
generation_pause_ms = {pause}
cycle_interval_secs = {interval}

# Character the content is produced for
[persona]
name = {persona_name:?}
market = {persona_market:?}
identity = {persona_identity:?}
posts_per_cycle = {posts}

# Local HTTP API (state + start/stop)
[api]
enabled = {api_enabled}
bind_addr = "{api_bind}"

# Logging configuration (RUST_LOG env var overrides)
[logging]
level = "{log_level}"
# JSON file logging (in addition to TUI buffer or stderr)
file_enabled = {log_file_enabled}
file_dir = "{log_file_dir}"
file_rotation = "{log_file_rotation}"  # hourly, daily, never
file_prefix = "{log_file_prefix}"
{learnings}"#,
            theme = self.theme,
            autostart = self.autostart,
            provider = self.backend.provider.as_str(),
            api_base = self.backend.api_base,
            api_key = self.api_key_to_toml(),
            key_env = self.backend.key_env,
            trend_model = self.backend.trend_model,
            planner_model = self.backend.planner_model,
            image_model = self.backend.image_model,
            timeout_secs = self.backend.timeout_secs,
            thinking_budget = self.backend.thinking_budget,
            image_size = self.backend.image_size,
            settle = self.timing.settle_delay_ms,
            pause = self.timing.generation_pause_ms,
            interval = self.timing.cycle_interval_secs,
            persona_name = self.persona.name,
            persona_market = self.persona.market,
            persona_identity = self.persona.identity,
            posts = self.persona.posts_per_cycle,
            api_enabled = self.api.enabled,
            api_bind = self.api.bind_addr,
            log_level = self.logging.level,
            log_file_enabled = self.logging.file_enabled,
            log_file_dir = self.logging.file_dir.display(),
            log_file_rotation = self.logging.file_rotation.as_str(),
            log_file_prefix = self.logging.file_prefix,
            learnings = self.learnings_to_toml(),
        )
    }
}
