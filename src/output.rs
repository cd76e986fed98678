//! Output formatting for CLI display.
//!
//! Provides the [`PrettyPrint`] trait for human-readable output
//! as an alternative to JSON serialization.

use chrono::{DateTime, Utc};

use crate::{Activity, Attachment, Category, Project, Query, Status, User, WikiPage, WorkPackage};

/// Trait for human-readable key-value output.
///
/// Implemented by resource types to provide formatted output
/// suitable for terminal display when `--json` is not specified.
pub trait PrettyPrint {
    /// Returns a formatted string for terminal display.
    fn pretty_print(&self) -> String;
}

/// Header line followed by a divider at least 30 columns wide.
fn header(title: String) -> Vec<String> {
    let divider = "─".repeat(title.chars().count().max(30));
    vec![title, divider]
}

fn timestamp(at: &DateTime<Utc>) -> String {
    at.format("%Y-%m-%d %H:%M:%S UTC").to_string()
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "yes"
    } else {
        "no"
    }
}

impl PrettyPrint for WorkPackage {
    fn pretty_print(&self) -> String {
        let mut lines = header(format!("Work package #{}", self.id));
        lines.push(format!("Subject:        {}", self.subject));

        if let Some(kind) = self.type_name() {
            lines.push(format!("Type:           {}", kind));
        }
        if let Some(status) = self.status_name() {
            lines.push(format!("Status:         {}", status));
        }
        if let Some(project) = self.project_name() {
            lines.push(format!("Project:        {}", project));
        }
        if let Some(assignee) = self.assignee_name() {
            lines.push(format!("Assignee:       {}", assignee));
        }

        match (self.start_date, self.due_date) {
            (Some(start), Some(due)) => {
                lines.push(format!("Dates:          {} → {}", start, due))
            }
            (Some(start), None) => lines.push(format!("Start:          {}", start)),
            (None, Some(due)) => lines.push(format!("Due:            {}", due)),
            (None, None) => {}
        }

        if let Some(done) = self.percentage_done {
            lines.push(format!("Done:           {}%", done));
        }
        if let Some(ref updated) = self.updated_at {
            lines.push(format!("Updated:        {}", timestamp(updated)));
        }

        if let Some(ref description) = self.description {
            if !description.raw.is_empty() {
                lines.push(String::new());
                lines.push(description.raw.clone());
            }
        }

        lines.join("\n")
    }
}

impl PrettyPrint for User {
    fn pretty_print(&self) -> String {
        let mut lines = header(format!("User #{}", self.id));
        lines.push(format!("Name:           {}", self.name));

        if let Some(ref login) = self.login {
            lines.push(format!("Login:          {}", login));
        }
        if let Some(ref email) = self.email {
            lines.push(format!("Email:          {}", email));
        }
        if let Some(ref status) = self.status {
            lines.push(format!("Status:         {}", status));
        }
        if let Some(admin) = self.admin {
            lines.push(format!("Admin:          {}", yes_no(admin)));
        }

        lines.join("\n")
    }
}

impl PrettyPrint for Project {
    fn pretty_print(&self) -> String {
        let mut lines = header(format!("Project: {}", self.identifier));
        lines.push(format!("Name:           {}", self.name));
        lines.push(format!("ID:             {}", self.id));
        lines.push(format!("Active:         {}", yes_no(self.active)));

        if self.public {
            lines.push("Visibility:     public".to_string());
        }
        if let Some(parent) = self.parent_name() {
            lines.push(format!("Parent:         {}", parent));
        }
        if let Some(ref created) = self.created_at {
            lines.push(format!("Created:        {}", timestamp(created)));
        }

        lines.join("\n")
    }
}

impl PrettyPrint for Status {
    fn pretty_print(&self) -> String {
        let mut lines = header(format!("Status #{}", self.id));
        lines.push(format!("Name:           {}", self.name));
        lines.push(format!("Closed:         {}", yes_no(self.is_closed)));
        lines.push(format!("Default:        {}", yes_no(self.is_default)));
        if let Some(ref color) = self.color {
            lines.push(format!("Color:          {}", color));
        }
        lines.join("\n")
    }
}

impl PrettyPrint for Query {
    fn pretty_print(&self) -> String {
        let mut lines = header(format!("Query #{}", self.id));
        lines.push(format!("Name:           {}", self.name));
        lines.push(format!("Public:         {}", yes_no(self.public)));
        lines.push(format!("Starred:        {}", yes_no(self.starred)));

        if !self.filters.is_empty() {
            let names: Vec<&str> = self.filters.iter().map(|f| f.name.as_str()).collect();
            lines.push(format!("Filters:        {}", names.join(", ")));
        }

        lines.join("\n")
    }
}

impl PrettyPrint for Attachment {
    fn pretty_print(&self) -> String {
        let mut lines = header(format!("Attachment #{}", self.id));
        lines.push(format!("File:           {}", self.file_name));
        lines.push(format!("Size:           {} bytes", self.file_size));

        if let Some(ref content_type) = self.content_type {
            lines.push(format!("Content type:   {}", content_type));
        }
        if let Some(ref digest) = self.digest {
            lines.push(format!("Digest:         {}:{}", digest.algorithm, digest.hash));
        }

        lines.join("\n")
    }
}

impl PrettyPrint for Activity {
    fn pretty_print(&self) -> String {
        let mut lines = header(format!("Activity #{} (version {})", self.id, self.version));

        if let Some(user) = self.user_name() {
            lines.push(format!("User:           {}", user));
        }
        if let Some(ref created) = self.created_at {
            lines.push(format!("Created:        {}", timestamp(created)));
        }
        for detail in &self.details {
            lines.push(format!("  • {}", detail.raw));
        }
        if let Some(comment) = self.comment_text() {
            lines.push(String::new());
            lines.push(comment.to_string());
        }

        lines.join("\n")
    }
}

impl PrettyPrint for Category {
    fn pretty_print(&self) -> String {
        let mut lines = header(format!("Category #{}", self.id));
        lines.push(format!("Name:           {}", self.name));
        if let Some(assignee) = self.links.default_assignee.as_ref().and_then(|l| l.title()) {
            lines.push(format!("Assignee:       {}", assignee));
        }
        lines.join("\n")
    }
}

impl PrettyPrint for WikiPage {
    fn pretty_print(&self) -> String {
        let mut lines = header(format!("Wiki page #{}", self.id));
        lines.push(format!("Title:          {}", self.title));
        if let Some(project) = self.project_name() {
            lines.push(format!("Project:        {}", project));
        }
        lines.join("\n")
    }
}
