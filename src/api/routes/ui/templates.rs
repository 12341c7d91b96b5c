//! HTML templates for the chat UI. Handlebars escapes everything
//! rendered with double braces, which matters here since both the
//! user's input and the model's output are untrusted.

use std::fmt;

use handlebars::Handlebars;

#[derive(Debug)]
pub enum Template {
    ChatPage,
}

impl fmt::Display for Template {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

const CHAT_PAGE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{{page_title}}</title>
<style>
  body { background-color: #f0f0f0; font-family: sans-serif; margin: 0; display: flex; }
  .sidebar { width: 240px; min-height: 100vh; background: #fafafa; border-right: 1px solid #ddd; padding: 16px; box-sizing: border-box; }
  .sidebar form { margin: 0; }
  .sidebar button { width: 100%; text-align: left; padding: 8px; margin: 2px 0; border: none; border-radius: 6px; background: transparent; cursor: pointer; }
  .sidebar button.active { background: #e0e0e6; font-weight: bold; }
  .sidebar .new-room { background: #0b93f6; color: white; text-align: center; margin-bottom: 12px; }
  .chat-container { flex: 1; max-width: 750px; margin: auto; background-color: white; border-radius: 8px; padding: 20px 20px 100px 20px; min-height: 100vh; box-sizing: border-box; box-shadow: 0 0 10px rgba(0,0,0,0.1); }
  .user-bubble { background-color: #0b93f6; color: white; padding: 10px 14px; border-radius: 18px; margin: 5px 0 5px auto; max-width: 75%; width: fit-content; white-space: pre-wrap; }
  .assistant-bubble { background-color: #e5e5ea; color: black; padding: 10px 14px; border-radius: 18px; margin: 5px auto 5px 0; max-width: 75%; width: fit-content; white-space: pre-wrap; }
  .notice { padding: 8px 12px; border-radius: 6px; margin-bottom: 8px; }
  .notice-info { background: #e6f4ea; }
  .notice-error { background: #fce8e6; }
  .chat-input { position: fixed; bottom: 20px; width: 710px; display: flex; gap: 8px; }
  .chat-input input { flex: 1; border-radius: 18px; padding: 10px 14px; border: 1px solid #ccc; }
</style>
</head>
<body>
{{#if rooms_enabled}}
<nav class="sidebar">
  <form method="post" action="/rooms"><button class="new-room" type="submit">+ New chat</button></form>
  {{#each rooms}}
  <form method="post" action="/rooms/{{id}}/activate">
    <button type="submit"{{#if active}} class="active"{{/if}}>{{title}}</button>
  </form>
  {{/each}}
</nav>
{{/if}}
<main class="chat-container">
  <h2 style="text-align:center; margin-bottom:20px;">{{page_title}}</h2>
  {{#each notices}}
  <div class="notice notice-{{level}}">{{message}}</div>
  {{/each}}
  {{#each turns}}
  <div class="{{role}}-bubble">{{content}}</div>
  {{/each}}
  <form class="chat-input" method="post" action="/chat">
    <input type="text" name="message" placeholder="Type a message" autocomplete="off" autofocus>
    <button type="submit">Send</button>
  </form>
</main>
</body>
</html>
"#;

pub fn templates<'a>() -> Handlebars<'a> {
    let mut registry = Handlebars::new();
    registry.set_strict_mode(true);
    registry
        .register_template_string(&Template::ChatPage.to_string(), CHAT_PAGE)
        .expect("Failed to register template");
    registry
}
