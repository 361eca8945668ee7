use crate::core::domain::Configuration;
use crate::gateway::factory::CatalogHandles;
use crate::members::domain::MemberService;
use crate::members::domain::service::MemberServiceImpl;

pub fn create_member_service(config: &Configuration, handles: &CatalogHandles) -> Box<dyn MemberService> {
    Box::new(MemberServiceImpl::new(config, handles.members.clone(), handles.loans.clone()))
}
