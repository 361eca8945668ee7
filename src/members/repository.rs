use crate::core::repository::Repository;
use crate::members::domain::model::MemberEntity;

pub trait MemberRepository: Repository<MemberEntity> {}
