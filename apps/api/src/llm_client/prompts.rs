// Shared system-prompt fragments for document generation.

/// Base persona for every generation call.
pub const WRITER_SYSTEM: &str =
    "You are a helpful assistant that writes resumes and cover letters.";

/// Asks the model for the line-oriented markup the renderer understands.
pub const FORMAT_INSTRUCTION: &str = "\
    Format the document as plain text lines. \
    Put the person's full name alone on the first line and their contact details on the second. \
    Start section headings with '### '. \
    Start list items with '- '. \
    Use a line containing only '---' as a separator. \
    Do not use any other markdown.";
