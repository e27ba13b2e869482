use crate::error::Result;
use crate::platform::PlatformApi;
use crate::responses::Info;

pub fn run<P: PlatformApi>(platform: &P, endpoint: &str) -> Result<Info> {
    let user = platform.user_info()?;
    Ok(Info {
        cli_version: env!("CARGO_PKG_VERSION").to_string(),
        endpoint: endpoint.to_string(),
        user_id: user.id,
        user_name: user.user_name,
        email: user.email,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::memory::fixtures::acme;

    #[test]
    fn test_info_reports_caller() {
        let platform = acme();
        let info = run(&platform, "https://tower.example/api").unwrap();
        assert_eq!(info.user_name, "ada");
        assert_eq!(info.endpoint, "https://tower.example/api");
        assert_eq!(platform.calls(), vec!["user_info"]);
    }
}
