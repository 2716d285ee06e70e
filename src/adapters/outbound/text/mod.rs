pub mod template_describer;

pub use template_describer::TemplateDescriptionGenerator;
