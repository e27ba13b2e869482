use crate::error::{Result, TowerError};
use crate::platform::PlatformApi;
use crate::reference::Reference;
use crate::resolve::ReferenceResolver;
use crate::responses::{OrganizationView, OrganizationsList};

pub fn list<P: PlatformApi>(platform: &P) -> Result<OrganizationsList> {
    let user = platform.user_info()?;
    let organizations = platform.list_organizations()?;
    Ok(OrganizationsList {
        user_name: user.user_name,
        organizations,
    })
}

pub fn view<P: PlatformApi>(platform: &P, organization: &Reference) -> Result<OrganizationView> {
    let resolved = ReferenceResolver::new(platform).resolve_organization(organization)?;
    let organization = platform
        .list_organizations()?
        .into_iter()
        .find(|o| o.org_id == resolved.id)
        .ok_or_else(|| TowerError::not_found("Organization", organization.to_string()))?;
    Ok(OrganizationView { organization })
}
