use vergen_gitcl::{Emitter, Gitcl};

// Git metadata for `prodscan::version_string()`. Outside a checkout vergen
// falls back to placeholder values instead of failing the build.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    let gitcl = Gitcl::builder().branch(true).sha(true).dirty(true).build();
    Emitter::default().add_instructions(&gitcl)?.emit()?;
    Ok(())
}
