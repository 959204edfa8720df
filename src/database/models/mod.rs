pub mod availability;
pub mod catalog;
pub mod fixture;
pub mod join_request;
pub mod standings;
pub mod team;
pub mod teamsheet;
pub mod user;

pub use availability::{Availability, AvailabilityInput, FixtureAvailability};
pub use catalog::{Season, SeasonInput, Sport, SportInput};
pub use fixture::{Fixture, FixtureInput, FixtureStatus, ResultInput};
pub use join_request::{JoinRequest, JoinRequestInput, JoinRequestStatus, PendingJoinRequest};
pub use standings::{StandingRow, TeamRecord};
pub use team::{
    AddMemberInput, CreateTeamInput, Team, TeamMember, TeamMemberInfo, TeamRole, TeamWithMembers,
    UpdateTeamInput, UserTeam,
};
pub use teamsheet::{
    FixtureTeamsheets, Teamsheet, TeamsheetEntryInput, TeamsheetInput, TeamsheetPlayer,
    TeamsheetView,
};
pub use user::{AuthResponse, CreateUserInput, LoginInput, User, UserInfo, UserRole};
