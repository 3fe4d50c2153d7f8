//! Setup guide for line-mcp
//!
//! This module contains the guide text displayed by `line-mcp-server guide`.

/// Print the setup guide to stdout
pub fn print_guide() {
    let version = env!("CARGO_PKG_VERSION");
    print!(
        r#"
================================================================================
                        line-mcp-server Setup Guide
                              Version {version}
================================================================================

This guide explains how to let MCP clients like Claude Desktop read and send
messages through the LINE desktop app.

--------------------------------------------------------------------------------
STEP 1: Install the helper programs
--------------------------------------------------------------------------------

macOS:
    brew install cliclick

    Then open System Settings > Privacy & Security and allow the terminal (or
    MCP client) running line-mcp-server under both "Accessibility" and
    "Automation > System Events".

Windows:
    Install AutoHotkey v2 (https://www.autohotkey.com/) and make sure the
    `autohotkey` command is on PATH.

Run `line-mcp-server setup` to check everything at once. On macOS it installs
cliclick through Homebrew when it is missing. A marker file
(~/.line-mcp-setup-complete) records a successful check; delete it to check
again.

--------------------------------------------------------------------------------
STEP 2: Configure the MCP client
--------------------------------------------------------------------------------

Create or edit `.mcp.json` (or claude_desktop_config.json):

    {{
      "mcpServers": {{
        "line": {{
          "command": "line-mcp-server",
          "args": ["serve"],
          "env": {{
            "CHAT_LOG_ON": "false"
          }}
        }}
      }}
    }}

For cargo-based development, use:

    {{
      "mcpServers": {{
        "line": {{
          "command": "cargo",
          "args": ["run", "-p", "line-mcp-server", "--", "serve"]
        }}
      }}
    }}

--------------------------------------------------------------------------------
STEP 3: Use it
--------------------------------------------------------------------------------

1. Log in to the LINE desktop app and leave it open
2. Do not touch the mouse or keyboard while a tool is running
3. Ask for things like:
   - "Summarize today's messages in the Family chat"
   - "Draft a reply to Alice saying I'll be late" (typed, not sent)
   - "Send 'on my way' to the Team chat"

--------------------------------------------------------------------------------
COMMAND LINE
--------------------------------------------------------------------------------

  line-mcp-server [serve]        Run the MCP server over stdio (default)
  line-mcp-server setup          Check helper programs and print a report
  line-mcp-server guide          Show this guide

  --chat-log                     Save every retrieved history to a file
  --chat-log-path <DIR>          Directory for those files (default: logs)
  --skip-setup                   Do not run the dependency check on start

--------------------------------------------------------------------------------
ENVIRONMENT VARIABLES
--------------------------------------------------------------------------------

  CHAT_LOG_ON                    "true" to save retrieved histories
  CHAT_LOG_PATH                  Directory for saved histories
  LINE_MCP_CLEAR_ON_FAILURE      "true" to clear the input box after a failed send
  LINE_MCP_SCRIPT_TIMEOUT_SECS   Timeout for one automation script (default: 30)
  RUST_LOG                       Log level (e.g., "info", "debug")

--------------------------------------------------------------------------------
AVAILABLE MCP TOOLS
--------------------------------------------------------------------------------

History:
  - get_line_chatroom_history_default   Scroll back 10 pages, then copy
  - get_line_chatroom_history_short     Scroll back 5 pages
  - get_line_chatroom_history_long      Scroll back 50 pages

Messages:
  - send_message_manual   Type a message and leave it for you to send
  - send_message_auto     Type a message and press Enter

Status:
  - is_line_running       Whether the LINE process is running
  - activate_line         Bring LINE to the foreground
  - ping                  Verify the server is running

Mentions: write "@name " with a trailing space, e.g. "@alice hello".

================================================================================
"#
    );
}
