// Prompt template for document generation.

/// Replace: {document_kind}, {name}, {email}, {phone}, {role}, {experience},
///          {skills}, {goals}
pub const DOCUMENT_PROMPT_TEMPLATE: &str = "\
Write a professional {document_kind} for the following details:
Name: {name}
Email: {email}
Phone: {phone}
Target Role: {role}
Experience: {experience}
Skills: {skills}
Career Goals: {goals}
";
