//! Solidity bindings for the campaign factory and per-campaign contracts.

use alloy_sol_types::sol;

sol! {
    struct Campaign {
        address campaignAddress;
        address owner;
        string name;
        string description;
        uint256 goal;
        uint256 creationTime;
    }

    struct Tier {
        string name;
        uint256 amount;
        uint256 backers;
    }

    interface ICrowdfundingFactory {
        function getAllCampaigns() external view returns (Campaign[] memory);
        function createCampaign(
            string name,
            string description,
            uint256 goal,
            uint256 durationInDays
        ) external;
    }

    interface ICrowdfunding {
        function getTiers() external view returns (Tier[] memory);
        function getCampaignStatus() external view returns (uint8);
        function getContractBalance() external view returns (uint256);
        function owner() external view returns (address);
        function fund(uint256 tierIndex) external payable;
        function withdraw() external;
        function refund() external;
    }
}
