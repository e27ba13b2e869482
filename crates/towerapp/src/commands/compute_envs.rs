use crate::error::Result;
use crate::model::ComputeEnv;
use crate::platform::PlatformApi;
use crate::reference::Reference;
use crate::resolve::ReferenceResolver;
use crate::responses::{ComputeEnvExported, ComputeEnvView, ComputeEnvsList, PrimaryComputeEnv};
use serde_json::{json, Map, Value};
use std::path::Path;
use tracing::info;

pub fn list<P: PlatformApi>(platform: &P, workspace: &Reference) -> Result<ComputeEnvsList> {
    let ws = ReferenceResolver::new(platform).resolve_workspace(workspace)?;
    let compute_envs = platform.list_compute_envs(ws.id, None)?;
    Ok(ComputeEnvsList {
        workspace: ws.display_ref(),
        compute_envs,
    })
}

/// Describes `compute_env`, or the workspace's primary environment when it is `None`.
pub fn view<P: PlatformApi>(
    platform: &P,
    workspace: &Reference,
    compute_env: Option<&str>,
) -> Result<ComputeEnvView> {
    let resolver = ReferenceResolver::new(platform);
    let ws = resolver.resolve_workspace(workspace)?;
    let ce = resolver.resolve_compute_env(compute_env, &ws)?;
    let compute_env = platform.describe_compute_env(&ce.id, ws.id)?;
    Ok(ComputeEnvView {
        workspace: ws.display_ref(),
        compute_env,
    })
}

/// Exports a definition that can be fed back into the platform. Written to `path` when
/// given, returned inline otherwise.
pub fn export<P: PlatformApi>(
    platform: &P,
    workspace: &Reference,
    compute_env: Option<&str>,
    path: Option<&Path>,
) -> Result<ComputeEnvExported> {
    let resolver = ReferenceResolver::new(platform);
    let ws = resolver.resolve_workspace(workspace)?;
    let ce = resolver.resolve_compute_env(compute_env, &ws)?;
    let described = platform.describe_compute_env(&ce.id, ws.id)?;
    let definition = definition(&described);

    if let Some(path) = path {
        let mut text = serde_json::to_string_pretty(&definition)?;
        text.push('\n');
        std::fs::write(path, text)?;
        info!(path = %path.display(), id = %described.id, "exported compute environment");
    }

    Ok(ComputeEnvExported {
        compute_env_name: described.name,
        path: path.map(|p| p.display().to_string()),
        definition,
    })
}

fn definition(ce: &ComputeEnv) -> Value {
    let mut definition = Map::new();
    definition.insert("name".to_string(), json!(ce.name));
    definition.insert("platform".to_string(), json!(ce.platform));
    if let Some(credentials) = &ce.credentials_id {
        definition.insert("credentialsId".to_string(), json!(credentials));
    }
    definition.insert(
        "config".to_string(),
        ce.config.clone().unwrap_or_else(|| json!({})),
    );
    Value::Object(definition)
}

pub fn get_primary<P: PlatformApi>(platform: &P, workspace: &Reference) -> Result<PrimaryComputeEnv> {
    let resolver = ReferenceResolver::new(platform);
    let ws = resolver.resolve_workspace(workspace)?;
    let ce = resolver.primary_compute_env(&ws)?;
    Ok(PrimaryComputeEnv {
        workspace: ws.display_ref(),
        compute_env_id: ce.id,
        compute_env_name: ce.name,
        updated: false,
    })
}

pub fn set_primary<P: PlatformApi>(
    platform: &P,
    workspace: &Reference,
    compute_env: &str,
) -> Result<PrimaryComputeEnv> {
    let resolver = ReferenceResolver::new(platform);
    let ws = resolver.resolve_workspace(workspace)?;
    let ce = resolver.resolve_compute_env(Some(compute_env), &ws)?;
    platform.set_primary_compute_env(&ce.id, ws.id)?;
    info!(id = %ce.id, workspace = %ws, "primary compute environment updated");
    Ok(PrimaryComputeEnv {
        workspace: ws.display_ref(),
        compute_env_id: ce.id,
        compute_env_name: ce.name,
        updated: true,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TowerError;
    use crate::platform::memory::fixtures::*;
    use crate::platform::memory::InMemoryPlatform;

    fn rnaseq() -> Reference {
        "acme/rnaseq".parse().unwrap()
    }

    #[test]
    fn test_list_marks_primary() {
        let platform = acme();
        let list = list(&platform, &rnaseq()).unwrap();
        assert_eq!(list.workspace, "[acme / rnaseq]");
        let primaries: Vec<_> = list
            .compute_envs
            .iter()
            .filter(|ce| ce.is_primary())
            .map(|ce| ce.id.as_str())
            .collect();
        assert_eq!(primaries, vec!["ce1"]);
    }

    #[test]
    fn test_view_defaults_to_primary() {
        let platform = acme();
        let view = view(&platform, &rnaseq(), None).unwrap();
        assert_eq!(view.compute_env.id, "ce1");
        assert!(view.compute_env.config.is_some());
        assert_eq!(platform.call_count("describe_compute_env"), 1);
    }

    #[test]
    fn test_view_without_primary_fails() {
        let platform = InMemoryPlatform::new()
            .with_compute_env(None, compute_env("ce9", "local", false));
        let err = view(&platform, &Reference::Unset, None).unwrap_err();
        assert_eq!(
            err.to_string(),
            "No primary compute environment found at [user] workspace"
        );
    }

    #[test]
    fn test_export_to_file() {
        let platform = acme();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ce.json");
        let exported = export(&platform, &rnaseq(), Some("aws-dev"), Some(&path)).unwrap();
        assert_eq!(exported.compute_env_name, "aws-dev");

        let written: Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written, exported.definition);
        assert_eq!(written["platform"], "aws-batch");
        assert_eq!(written["credentialsId"], "cred1");
        assert_eq!(written["config"]["region"], "eu-west-1");
        assert!(written.get("id").is_none());
    }

    #[test]
    fn test_export_inline() {
        let platform = acme();
        let exported = export(&platform, &rnaseq(), None, None).unwrap();
        assert_eq!(exported.path, None);
        assert_eq!(exported.definition["name"], "aws-prod");
    }

    #[test]
    fn test_primary_get_and_set() {
        let platform = acme();
        let current = get_primary(&platform, &rnaseq()).unwrap();
        assert_eq!(current.compute_env_id, "ce1");
        assert!(!current.updated);

        let updated = set_primary(&platform, &rnaseq(), "aws-dev").unwrap();
        assert_eq!(updated.compute_env_id, "ce2");
        assert!(updated.updated);
        assert_eq!(get_primary(&platform, &rnaseq()).unwrap().compute_env_name, "aws-dev");
    }

    #[test]
    fn test_set_unknown_primary() {
        let platform = acme();
        let err = set_primary(&platform, &rnaseq(), "gcp").unwrap_err();
        assert!(matches!(err, TowerError::ReferenceNotFound { .. }));
        assert_eq!(platform.call_count("set_primary_compute_env"), 0);
    }
}
