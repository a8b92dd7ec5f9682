//! Client code generation.
//!
//! Eight language-specific source snippets that each perform the same
//! authenticated POST of the compiled request body. These are plain string
//! templates for user copy-paste; nothing here is executed.

use super::compile::ApiTarget;
use crate::utils;
use derive_more::Display;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Target language of a generated snippet
#[derive(Debug, Display, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CodeLanguage {
    #[display("javascript")]
    JavaScript,
    #[display("python")]
    Python,
    #[display("php")]
    Php,
    #[display("java")]
    Java,
    #[display("csharp")]
    CSharp,
    #[display("ruby")]
    Ruby,
    #[display("go")]
    Go,
    #[display("curl")]
    Curl,
}

impl CodeLanguage {
    /// Key understood by syntax highlighters
    pub fn syntax_language(&self) -> &'static str {
        match self {
            CodeLanguage::JavaScript => "javascript",
            CodeLanguage::Python => "python",
            CodeLanguage::Php => "php",
            CodeLanguage::Java => "java",
            CodeLanguage::CSharp => "csharp",
            CodeLanguage::Ruby => "ruby",
            CodeLanguage::Go => "go",
            CodeLanguage::Curl => "bash",
        }
    }
}

fn api_name(target: ApiTarget) -> &'static str {
    match target {
        ApiTarget::SendZen => "SendZen WhatsApp API",
        ApiTarget::Facebook => "Facebook Graph API",
    }
}

fn class_name(target: ApiTarget) -> &'static str {
    match target {
        ApiTarget::SendZen => "SendZenAPI",
        ApiTarget::Facebook => "FacebookGraphAPI",
    }
}

/// Generates the snippet for `language`
pub fn generate_snippet(
    language: CodeLanguage,
    url: &str,
    body: &Value,
    token: &str,
    target: ApiTarget,
) -> String {
    match language {
        CodeLanguage::JavaScript => generate_javascript(url, body, token, target),
        CodeLanguage::Python => generate_python(url, body, token, target),
        CodeLanguage::Php => generate_php(url, body, token, target),
        CodeLanguage::Java => generate_java(url, body, token, target),
        CodeLanguage::CSharp => generate_csharp(url, body, token, target),
        CodeLanguage::Ruby => generate_ruby(url, body, token, target),
        CodeLanguage::Go => generate_go(url, body, token, target),
        CodeLanguage::Curl => generate_curl(url, body, token, target),
    }
}

fn generate_javascript(url: &str, body: &Value, token: &str, target: ApiTarget) -> String {
    format!(
        r#"// {api} Integration - JavaScript (Node.js)
const axios = require('axios');

const sendMessage = async () => {{
  try {{
    const response = await axios.post('{url}', {body}, {{
      headers: {{
        'Authorization': 'Bearer {token}',
        'Content-Type': 'application/json'
      }}
    }});

    console.log('Message sent successfully:', response.data);
    return response.data;
  }} catch (error) {{
    console.error('Error sending message:', error.response?.data || error.message);
    throw error;
  }}
}};

// Call the function
sendMessage();"#,
        api = api_name(target),
        body = utils::pretty_json(body, 4),
    )
}

fn generate_python(url: &str, body: &Value, token: &str, target: ApiTarget) -> String {
    format!(
        r#"# {api} Integration - Python
import requests
import json

def send_message():
    url = '{url}'
    headers = {{
        'Authorization': f'Bearer {token}',
        'Content-Type': 'application/json'
    }}
    data = {body}

    try:
        response = requests.post(url, headers=headers, json=data)
        response.raise_for_status()
        print('Message sent successfully:', response.json())
        return response.json()
    except requests.exceptions.RequestException as e:
        print('Error sending message:', e)
        if hasattr(e, 'response') and e.response is not None:
            print('Response:', e.response.text)
        raise

# Call the function
send_message()"#,
        api = api_name(target),
        body = utils::pretty_json(body, 4),
    )
}

fn generate_php(url: &str, body: &Value, token: &str, target: ApiTarget) -> String {
    format!(
        r#"<?php
// {api} Integration - PHP
function sendMessage() {{
    $url = '{url}';
    $data = {body};

    $options = [
        'http' => [
            'header' => [
                "Authorization: Bearer {token}",
                "Content-Type: application/json"
            ],
            'method' => 'POST',
            'content' => json_encode($data)
        ]
    ];

    $context = stream_context_create($options);
    $result = file_get_contents($url, false, $context);

    if ($result === FALSE) {{
        throw new Exception('Error sending message');
    }}

    $response = json_decode($result, true);
    echo "Message sent successfully: " . json_encode($response) . "\n";
    return $response;
}}

// Call the function
try {{
    sendMessage();
}} catch (Exception $e) {{
    echo "Error: " . $e->getMessage() . "\n";
}}
?>"#,
        api = api_name(target),
        body = utils::pretty_json(body, 4),
    )
}

fn generate_java(url: &str, body: &Value, token: &str, target: ApiTarget) -> String {
    format!(
        r#"// {api} Integration - Java
import java.net.http.HttpClient;
import java.net.http.HttpRequest;
import java.net.http.HttpResponse;
import java.net.URI;
import java.net.http.HttpRequest.BodyPublishers;
import java.net.http.HttpResponse.BodyHandlers;
import com.fasterxml.jackson.databind.ObjectMapper;

public class {class} {{
    private static final String API_URL = "{url}";
    private static final String ACCESS_TOKEN = "{token}";

    public static void main(String[] args) {{
        try {{
            sendMessage();
        }} catch (Exception e) {{
            System.err.println("Error: " + e.getMessage());
        }}
    }}

    public static void sendMessage() throws Exception {{
        ObjectMapper mapper = new ObjectMapper();
        String requestBody = mapper.writeValueAsString({body});

        HttpClient client = HttpClient.newHttpClient();
        HttpRequest request = HttpRequest.newBuilder()
            .uri(URI.create(API_URL))
            .header("Authorization", "Bearer " + ACCESS_TOKEN)
            .header("Content-Type", "application/json")
            .POST(BodyPublishers.ofString(requestBody))
            .build();

        HttpResponse<String> response = client.send(request, BodyHandlers.ofString());

        if (response.statusCode() == 200) {{
            System.out.println("Message sent successfully: " + response.body());
        }} else {{
            System.err.println("Error sending message: " + response.body());
        }}
    }}
}}"#,
        api = api_name(target),
        class = class_name(target),
        body = utils::pretty_json(body, 8),
    )
}

fn generate_csharp(url: &str, body: &Value, token: &str, target: ApiTarget) -> String {
    format!(
        r#"// {api} Integration - C# (.NET)
using System;
using System.Net.Http;
using System.Text;
using System.Text.Json;
using System.Threading.Tasks;

public class {class}
{{
    private static readonly string ApiUrl = "{url}";
    private static readonly string AccessToken = "{token}";

    public static async Task Main(string[] args)
    {{
        try
        {{
            await SendMessageAsync();
        }}
        catch (Exception ex)
        {{
            Console.WriteLine($"Error: {{ex.Message}}");
        }}
    }}

    public static async Task SendMessageAsync()
    {{
        using var client = new HttpClient();
        client.DefaultRequestHeaders.Add("Authorization", $"Bearer {{AccessToken}}");

        var requestBody = {body};
        var json = JsonSerializer.Serialize(requestBody, new JsonSerializerOptions {{ WriteIndented = true }});
        var content = new StringContent(json, Encoding.UTF8, "application/json");

        try
        {{
            var response = await client.PostAsync(ApiUrl, content);
            var responseContent = await response.Content.ReadAsStringAsync();

            if (response.IsSuccessStatusCode)
            {{
                Console.WriteLine($"Message sent successfully: {{responseContent}}");
            }}
            else
            {{
                Console.WriteLine($"Error sending message: {{responseContent}}");
            }}
        }}
        catch (Exception ex)
        {{
            Console.WriteLine($"Error: {{ex.Message}}");
        }}
    }}
}}"#,
        api = api_name(target),
        class = class_name(target),
        body = utils::pretty_json(body, 8),
    )
}

fn generate_ruby(url: &str, body: &Value, token: &str, target: ApiTarget) -> String {
    format!(
        r#"# {api} Integration - Ruby
require 'net/http'
require 'json'
require 'uri'

def send_message
  uri = URI('{url}')
  http = Net::HTTP.new(uri.host, uri.port)
  http.use_ssl = true

  request = Net::HTTP::Post.new(uri)
  request['Authorization'] = 'Bearer {token}'
  request['Content-Type'] = 'application/json'
  request.body = {body}.to_json

  response = http.request(request)

  if response.code == '200'
    puts "Message sent successfully: #{{response.body}}"
  else
    puts "Error sending message: #{{response.body}}"
  end

  JSON.parse(response.body)
rescue => e
  puts "Error: #{{e.message}}"
end

# Call the function
send_message"#,
        api = api_name(target),
        body = utils::pretty_json(body, 2),
    )
}

fn generate_go(url: &str, body: &Value, token: &str, target: ApiTarget) -> String {
    format!(
        r#"// {api} Integration - Go
package main

import (
    "bytes"
    "encoding/json"
    "fmt"
    "io"
    "net/http"
)

func sendMessage() error {{
    url := "{url}"
    token := "{token}"

    data := {body}
    jsonData, err := json.Marshal(data)
    if err != nil {{
        return fmt.Errorf("error marshaling data: %v", err)
    }}

    req, err := http.NewRequest("POST", url, bytes.NewBuffer(jsonData))
    if err != nil {{
        return fmt.Errorf("error creating request: %v", err)
    }}

    req.Header.Set("Authorization", "Bearer "+token)
    req.Header.Set("Content-Type", "application/json")

    client := &http.Client{{}}
    resp, err := client.Do(req)
    if err != nil {{
        return fmt.Errorf("error making request: %v", err)
    }}
    defer resp.Body.Close()

    body, err := io.ReadAll(resp.Body)
    if err != nil {{
        return fmt.Errorf("error reading response: %v", err)
    }}

    if resp.StatusCode == http.StatusOK {{
        fmt.Printf("Message sent successfully: %s\n", string(body))
    }} else {{
        fmt.Printf("Error sending message: %s\n", string(body))
    }}

    return nil
}}

func main() {{
    if err := sendMessage(); err != nil {{
        fmt.Printf("Error: %v\n", err)
    }}
}}"#,
        api = api_name(target),
        body = utils::pretty_json(body, 4),
    )
}

fn generate_curl(url: &str, body: &Value, token: &str, target: ApiTarget) -> String {
    format!(
        "# {api} Integration - cURL\ncurl -X POST '{url}' \\\n  -H 'Authorization: Bearer {token}' \\\n  -H 'Content-Type: application/json' \\\n  -d '{body}'",
        api = api_name(target),
        body = utils::pretty_json(body, 2).replace('\'', "'\\''"),
    )
}
