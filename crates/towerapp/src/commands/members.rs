use super::{page_info, page_request};
use crate::error::Result;
use crate::pagination::Pagination;
use crate::platform::PlatformApi;
use crate::reference::Reference;
use crate::resolve::ReferenceResolver;
use crate::responses::{CollaboratorsList, MembersList, TeamsList};

pub fn list_members<P: PlatformApi>(
    platform: &P,
    organization: &Reference,
    pagination: &Pagination,
    filter: Option<&str>,
) -> Result<MembersList> {
    let request = page_request(pagination, filter)?;
    let org = ReferenceResolver::new(platform).resolve_organization(organization)?;
    let page = platform.list_members(org.id, &request)?;
    Ok(MembersList {
        organization: org.display_ref(),
        pagination: Some(page_info(&page, &request)),
        members: page.items,
    })
}

/// Collaborators are users with access to some workspace of the organization without
/// being members of it.
pub fn list_collaborators<P: PlatformApi>(
    platform: &P,
    organization: &Reference,
    pagination: &Pagination,
) -> Result<CollaboratorsList> {
    let request = page_request(pagination, None)?;
    let org = ReferenceResolver::new(platform).resolve_organization(organization)?;
    let page = platform.list_collaborators(org.id, &request)?;
    Ok(CollaboratorsList {
        organization: org.display_ref(),
        pagination: Some(page_info(&page, &request)),
        collaborators: page.items,
    })
}

pub fn list_teams<P: PlatformApi>(
    platform: &P,
    organization: &Reference,
    pagination: &Pagination,
) -> Result<TeamsList> {
    let request = page_request(pagination, None)?;
    let org = ReferenceResolver::new(platform).resolve_organization(organization)?;
    let page = platform.list_teams(org.id, &request)?;
    Ok(TeamsList {
        organization: org.display_ref(),
        pagination: Some(page_info(&page, &request)),
        teams: page.items,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TowerError;
    use crate::pagination::{Max, PaginationInfo};
    use crate::platform::memory::fixtures::*;
    use crate::platform::PageRequest;
    use crate::render::{render, RenderOptions};

    #[test]
    fn test_collaborators_by_org_id() {
        let platform = acme();
        let list = list_collaborators(
            &platform,
            &Reference::NumericId(ACME_ORG_ID),
            &Pagination::default(),
        )
        .unwrap();

        assert_eq!(
            platform.last_page_request(),
            Some(PageRequest::new(Max::Bounded(100), 0))
        );
        assert_eq!(platform.calls(), vec!["list_collaborators"]);
        let ids: Vec<i64> = list.collaborators.iter().map(|m| m.member_id).collect();
        assert_eq!(ids, vec![30, 4, 12]);
        assert_eq!(list.pagination, Some(PaginationInfo::new(3, 3, 0)));

        let out = render(&list, &RenderOptions::default()).unwrap();
        assert!(out.starts_with("  Collaborators for [27736513644467] organization:\n"));
        let barbara = out.find("barbara").unwrap();
        let ken = out.find("ken").unwrap();
        let linus = out.find("linus").unwrap();
        assert!(barbara < ken && ken < linus);
    }

    #[test]
    fn test_second_page_offset() {
        let platform = acme();
        let pagination = Pagination {
            page: Some(2),
            ..Default::default()
        };
        let list = list_collaborators(&platform, &Reference::Name("acme".into()), &pagination)
            .unwrap();
        assert_eq!(platform.last_page_request().map(|p| p.offset), Some(100));
        assert!(list.collaborators.is_empty());
        assert_eq!(list.organization, "[acme]");
    }

    #[test]
    fn test_invalid_pagination_rejected_before_any_call() {
        let platform = acme();
        let pagination = Pagination {
            page: Some(0),
            ..Default::default()
        };
        let err = list_teams(&platform, &Reference::Name("acme".into()), &pagination).unwrap_err();
        assert!(matches!(err, TowerError::InvalidArgument(_)));
        assert!(platform.calls().is_empty());
    }

    #[test]
    fn test_members_filter_and_window() {
        let platform = acme();
        let pagination = Pagination {
            max: Some(1),
            ..Default::default()
        };
        let list = list_members(
            &platform,
            &Reference::NumericId(ACME_ORG_ID),
            &pagination,
            Some("a"),
        )
        .unwrap();
        assert_eq!(list.members.len(), 1);
        assert_eq!(list.pagination, Some(PaginationInfo::new(1, 3, 0)));
        assert_eq!(
            platform.last_page_request().and_then(|p| p.search),
            Some("a".to_string())
        );
    }

    #[test]
    fn test_organization_required() {
        let platform = acme();
        let err = list_teams(&platform, &Reference::Unset, &Pagination::default()).unwrap_err();
        assert!(matches!(err, TowerError::MissingReference("organization")));
    }

    #[test]
    fn test_forbidden_organization_surfaces_api_error() {
        let platform = acme();
        let err = list_teams(&platform, &Reference::NumericId(9), &Pagination::default())
            .unwrap_err();
        assert_eq!(err.status(), Some(403));
    }
}
