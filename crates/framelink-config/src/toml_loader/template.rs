//! Default TOML config template with inline documentation comments.

/// Generate the default TOML config content with comments.
pub(crate) fn default_config_toml() -> String {
    r##"# Framelink Configuration
# Schema version 1
# Only override what you want to change -- missing fields use defaults.

[transport]
# Origin outbound envelopes are restricted to. "*" is not accepted.
# target_origin = "framelink://localhost"
# How far to trust the window id children put on their messages.
# routing = "trusting"   # trusting, verified

[frame]
# width = "100%"
# height = "100%"
# border = 0             # 0-16

[logging]
# level = "info"         # trace, debug, info, warn, error
"##
    .to_string()
}
