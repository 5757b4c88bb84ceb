use crate::error::Result;
use espkit::engine::registry::ModelRegistry;

pub fn run() -> Result<()> {
    let registry = ModelRegistry::builtin();
    print!("{}", render_table(&registry));
    Ok(())
}

fn render_table(registry: &ModelRegistry) -> String {
    let mut out = format!(
        "{:<14} {:<12} {:<10} {:<10} {}\n",
        "NAME", "KIND", "BROKEN-UP", "BATCHED", "DESCRIPTION"
    );
    for model in registry.iter() {
        let yes_no = |b: bool| if b { "yes" } else { "no" };
        out.push_str(&format!(
            "{:<14} {:<12} {:<10} {:<10} {}\n",
            model.name,
            model.kind.to_string(),
            yes_no(model.capabilities.broken_up),
            yes_no(model.capabilities.batched),
            model.description
        ));
    }
    out
}
