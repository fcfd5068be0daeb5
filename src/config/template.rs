/// Template written by `pathbridge --init`.
pub fn generate_init_template() -> String {
	r#"# pathbridge configuration
# Files named .pathbridge.toml are collected from the current directory upward,
# then ~/.pathbridge.toml. `root = true` stops the upward walk.
root = true

# The process on the other side of the namespace boundary.
# Arguments after `--` on the command line take precedence.
[remote]
command = "wsl"
args = []

# External path translator. "{path}" is replaced with the path to translate.
[translator]
to-remote = ["wsl", "wslpath", "-u", "{path}"]
to-local = ["wsl", "wslpath", "-w", "{path}"]
# Allow only one translation at a time across both directions.
serialize = false

[classifier]
# Strings matching any of these are never treated as paths.
exclude = ["^[a-zA-Z][a-zA-Z0-9+.-]*://"]
# Only rewrite strings naming regular files (not directories).
files-only = false

# Static root mappings, tried before the translator command.
# [[mappings]]
# local = 'C:\Users\me\proj'
# remote = "/home/me/proj"
"#
	.to_string()
}
