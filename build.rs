use vergen::{BuildBuilder, Emitter};
use vergen_git2::Git2Builder;

// Emits VERGEN_BUILD_DATE, VERGEN_GIT_SHA and VERGEN_GIT_DESCRIBE for `mythicard --version`.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    let build = BuildBuilder::default().build_date(true).build()?;

    let git2 = Git2Builder::default()
        .sha(true)
        .describe(true, true, None)
        .build();

    match git2 {
        Ok(git2) => {
            Emitter::default()
                .add_instructions(&build)?
                .add_instructions(&git2)?
                .emit()?;
        }
        Err(_) => {
            // Source tarballs have no repository to describe.
            println!("cargo:rustc-env=VERGEN_GIT_SHA=unknown");
            println!("cargo:rustc-env=VERGEN_GIT_DESCRIBE=unknown");
            Emitter::default().add_instructions(&build)?.emit()?;
        }
    }

    Ok(())
}
